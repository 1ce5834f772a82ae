//! Accessibility backend over the macOS AX C API.
//!
//! Every call here talks to another process over IPC and may fail at any
//! time; failures surface as absent values, never as panics.

use std::collections::HashMap;
use std::ffi::c_void;
use std::fmt;

use accessibility_sys::{
    kAXErrorInvalidUIElement, kAXErrorSuccess, kAXValueTypeCGPoint, kAXValueTypeCGSize, AXUIElementCopyActionNames,
    AXUIElementCopyAttributeValue, AXUIElementCopyElementAtPosition,
    AXUIElementCopyMultipleAttributeValues, AXUIElementCreateApplication,
    AXUIElementCreateSystemWide, AXUIElementGetPid, AXUIElementGetTypeID,
    AXUIElementPerformAction, AXUIElementRef, AXUIElementSetMessagingTimeout, AXValueGetType,
    AXValueGetTypeID, AXValueGetValue, AXValueRef,
};
use core_foundation::array::{
    CFArray, CFArrayGetCount, CFArrayGetTypeID, CFArrayGetValueAtIndex, CFArrayRef,
};
use core_foundation::base::{CFGetTypeID, CFRelease, CFRetain, CFTypeRef, TCFType};
use core_foundation::boolean::CFBoolean;
use core_foundation::string::CFString;
use core_graphics::geometry::{CGPoint, CGSize};

use crate::error::HintError;
use crate::hints::accessor::{AttributeMap, AxValue};
use crate::hints::{Accessibility, Pid, Point, Size};

/// Seconds an unresponsive application may block a single AX request.
const MESSAGING_TIMEOUT: f32 = 1.0;

/// RAII guard for CoreFoundation objects. Calls `CFRelease` on drop.
struct CfRef(*const c_void);

impl CfRef {
    /// Take ownership of a +1 reference. Returns `None` if null.
    fn wrap(ptr: *const c_void) -> Option<Self> {
        if ptr.is_null() {
            None
        } else {
            Some(Self(ptr))
        }
    }

    fn as_ptr(&self) -> CFTypeRef {
        self.0
    }
}

impl Drop for CfRef {
    fn drop(&mut self) {
        unsafe { CFRelease(self.0) }
    }
}

/// Retained handle to a node in another process's accessibility tree.
pub struct AxNode(AXUIElementRef);

// AXUIElementRef is an immutable CF object; the shell only issues AX
// requests from the main thread.
unsafe impl Send for AxNode {}
unsafe impl Sync for AxNode {}

impl AxNode {
    /// Take ownership of a +1 reference.
    fn wrap(ptr: AXUIElementRef) -> Option<Self> {
        if ptr.is_null() {
            None
        } else {
            Some(Self(ptr))
        }
    }

    /// Retain a borrowed reference, e.g. one stored inside a CFArray.
    fn retain(ptr: AXUIElementRef) -> Option<Self> {
        if ptr.is_null() {
            return None;
        }
        unsafe { CFRetain(ptr as CFTypeRef) };
        Some(Self(ptr))
    }

    fn as_ptr(&self) -> AXUIElementRef {
        self.0
    }
}

impl Clone for AxNode {
    fn clone(&self) -> Self {
        unsafe { CFRetain(self.0 as CFTypeRef) };
        Self(self.0)
    }
}

impl Drop for AxNode {
    fn drop(&mut self) {
        unsafe { CFRelease(self.0 as CFTypeRef) }
    }
}

impl fmt::Debug for AxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AxNode").field(&self.0).finish()
    }
}

unsafe fn decode_ax_value(value: AXValueRef) -> Option<AxValue<AxNode>> {
    let kind = AXValueGetType(value);
    if kind == kAXValueTypeCGPoint {
        let mut point = CGPoint::new(0.0, 0.0);
        let ok = AXValueGetValue(value, kind, (&mut point as *mut CGPoint).cast::<c_void>());
        ok.then(|| AxValue::Point(Point::new(point.x, point.y)))
    } else if kind == kAXValueTypeCGSize {
        let mut size = CGSize::new(0.0, 0.0);
        let ok = AXValueGetValue(value, kind, (&mut size as *mut CGSize).cast::<c_void>());
        ok.then(|| AxValue::Size(Size::new(size.width, size.height)))
    } else {
        // Error-typed and range values are treated as absent.
        None
    }
}

unsafe fn element_array(array: CFArrayRef) -> Vec<AxNode> {
    let count = CFArrayGetCount(array);
    (0..count)
        .filter_map(|i| {
            let item = CFArrayGetValueAtIndex(array, i);
            if item.is_null() || CFGetTypeID(item) != AXUIElementGetTypeID() {
                return None;
            }
            AxNode::retain(item as AXUIElementRef)
        })
        .collect()
}

unsafe fn string_array(array: CFArrayRef) -> Vec<String> {
    let count = CFArrayGetCount(array);
    (0..count)
        .filter_map(|i| {
            let item = CFArrayGetValueAtIndex(array, i);
            if item.is_null() || CFGetTypeID(item) != CFString::type_id() {
                return None;
            }
            Some(CFString::wrap_under_get_rule(item as _).to_string())
        })
        .collect()
}

/// Map a borrowed CF value onto the closed attribute value set.
unsafe fn decode(value: CFTypeRef) -> Option<AxValue<AxNode>> {
    if value.is_null() {
        return None;
    }
    let type_id = CFGetTypeID(value);
    if type_id == CFString::type_id() {
        Some(AxValue::String(
            CFString::wrap_under_get_rule(value as _).to_string(),
        ))
    } else if type_id == CFBoolean::type_id() {
        Some(AxValue::Bool(CFBoolean::wrap_under_get_rule(value as _).into()))
    } else if type_id == AXUIElementGetTypeID() {
        AxNode::retain(value as AXUIElementRef).map(AxValue::Element)
    } else if type_id == AXValueGetTypeID() {
        decode_ax_value(value as AXValueRef)
    } else if type_id == CFArrayGetTypeID() {
        Some(AxValue::Elements(element_array(value as CFArrayRef)))
    } else {
        None
    }
}

#[derive(Debug, Default)]
pub struct MacAx;

impl MacAx {
    pub fn new() -> Self {
        Self
    }
}

impl Accessibility for MacAx {
    type Node = AxNode;

    fn attribute(&self, node: &AxNode, name: &str) -> Option<AxValue<AxNode>> {
        unsafe {
            let attr = CFString::new(name);
            let mut value: CFTypeRef = std::ptr::null();
            let result =
                AXUIElementCopyAttributeValue(node.as_ptr(), attr.as_concrete_TypeRef(), &mut value);
            if result != kAXErrorSuccess {
                return None;
            }
            let guard = CfRef::wrap(value)?;
            decode(guard.as_ptr())
        }
    }

    /// One round trip for the whole batch; missing entries come back as
    /// error values and are left out of the map.
    fn attributes<'a>(&self, node: &AxNode, names: &[&'a str]) -> AttributeMap<'a, AxNode> {
        let mut map = HashMap::with_capacity(names.len());
        let keys: Vec<CFString> = names.iter().map(|name| CFString::new(name)).collect();
        let keys = CFArray::from_CFTypes(&keys);

        unsafe {
            let mut values: CFArrayRef = std::ptr::null();
            let result = AXUIElementCopyMultipleAttributeValues(
                node.as_ptr(),
                keys.as_concrete_TypeRef(),
                0,
                &mut values,
            );
            if result != kAXErrorSuccess {
                return map;
            }
            let Some(guard) = CfRef::wrap(values as CFTypeRef) else {
                return map;
            };
            let values = guard.as_ptr() as CFArrayRef;
            let count = CFArrayGetCount(values).max(0) as usize;
            for (i, name) in names.iter().enumerate().take(count) {
                if let Some(value) = decode(CFArrayGetValueAtIndex(values, i as isize)) {
                    map.insert(*name, value);
                }
            }
        }
        map
    }

    fn actions(&self, node: &AxNode) -> Vec<String> {
        unsafe {
            let mut names: CFArrayRef = std::ptr::null();
            if AXUIElementCopyActionNames(node.as_ptr(), &mut names) != kAXErrorSuccess {
                return Vec::new();
            }
            match CfRef::wrap(names as CFTypeRef) {
                Some(guard) => string_array(guard.as_ptr() as CFArrayRef),
                None => Vec::new(),
            }
        }
    }

    fn element_at(&self, point: Point) -> Option<AxNode> {
        unsafe {
            let system_wide = AxNode::wrap(AXUIElementCreateSystemWide())?;
            let mut element: AXUIElementRef = std::ptr::null_mut();
            let result = AXUIElementCopyElementAtPosition(
                system_wide.as_ptr(),
                point.x as f32,
                point.y as f32,
                &mut element,
            );
            if result != kAXErrorSuccess {
                return None;
            }
            AxNode::wrap(element)
        }
    }

    fn owner_pid(&self, node: &AxNode) -> Option<Pid> {
        let mut pid: Pid = 0;
        let result = unsafe { AXUIElementGetPid(node.as_ptr(), &mut pid) };
        (result == kAXErrorSuccess).then_some(pid)
    }

    fn application(&self, pid: Pid) -> Option<AxNode> {
        let app = AxNode::wrap(unsafe { AXUIElementCreateApplication(pid) })?;
        unsafe { AXUIElementSetMessagingTimeout(app.as_ptr(), MESSAGING_TIMEOUT) };
        Some(app)
    }

    fn perform_action(&self, node: &AxNode, action: &str) -> Result<(), HintError> {
        let name = CFString::new(action);
        let result = unsafe { AXUIElementPerformAction(node.as_ptr(), name.as_concrete_TypeRef()) };
        if result == kAXErrorSuccess {
            Ok(())
        } else {
            Err(action_error(action, result))
        }
    }
}

/// An invalid element means the handle outlived its UI; anything else is a
/// refused action.
fn action_error(action: &str, code: i32) -> HintError {
    if code == kAXErrorInvalidUIElement {
        HintError::StaleElement
    } else {
        HintError::ActionFailed {
            action: action.to_string(),
            code,
        }
    }
}

pub fn is_process_trusted() -> bool {
    unsafe { accessibility_sys::AXIsProcessTrusted() }
}

/// Like `is_process_trusted`, but lets the system show its permission prompt.
pub fn is_process_trusted_with_prompt() -> bool {
    unsafe {
        use core_foundation::dictionary::CFDictionary;

        let key = CFString::wrap_under_get_rule(accessibility_sys::kAXTrustedCheckOptionPrompt);
        let dict = CFDictionary::from_CFType_pairs(&[(key, CFBoolean::true_value())]);
        accessibility_sys::AXIsProcessTrustedWithOptions(dict.as_concrete_TypeRef())
    }
}
