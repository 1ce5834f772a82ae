use std::ptr::NonNull;

use block2::RcBlock;
use objc2::rc::Retained;
use objc2::runtime::{NSObjectProtocol, ProtocolObject};
use objc2_app_kit::{
    NSRunningApplication, NSWorkspace, NSWorkspaceApplicationKey,
    NSWorkspaceDidActivateApplicationNotification,
};
use objc2_foundation::{NSNotification, NSNotificationCenter, NSOperationQueue};

use crate::hints::Pid;

/// Observer for "application did activate" workspace notifications,
/// delivered on the main queue. Removed on drop.
pub struct AppSwitchObserver {
    center: Retained<NSNotificationCenter>,
    token: Retained<ProtocolObject<dyn NSObjectProtocol>>,
}

fn activated_pid(notification: &NSNotification) -> Option<Pid> {
    let info = notification.userInfo()?;
    let app = unsafe { info.objectForKey(NSWorkspaceApplicationKey) }?;
    let app = app.downcast::<NSRunningApplication>().ok()?;
    Some(app.processIdentifier())
}

impl AppSwitchObserver {
    pub fn install<F>(on_activate: F) -> Self
    where
        F: Fn(Pid) + 'static,
    {
        let center = NSWorkspace::sharedWorkspace().notificationCenter();
        let block = RcBlock::new(move |notification: NonNull<NSNotification>| {
            let notification = unsafe { notification.as_ref() };
            if let Some(pid) = activated_pid(notification) {
                on_activate(pid);
            }
        });

        let token = unsafe {
            center.addObserverForName_object_queue_usingBlock(
                Some(NSWorkspaceDidActivateApplicationNotification),
                None,
                Some(&NSOperationQueue::mainQueue()),
                &block,
            )
        };

        Self { center, token }
    }
}

// The observer token is only handed back to NSNotificationCenter, which is
// thread-safe. The shell installs and drops it on the main thread.
unsafe impl Send for AppSwitchObserver {}
unsafe impl Sync for AppSwitchObserver {}

impl Drop for AppSwitchObserver {
    fn drop(&mut self) {
        unsafe { self.center.removeObserver(&self.token) };
    }
}
