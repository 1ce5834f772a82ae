//! Menu-bar application shell: overlay panel, hotkey, tray and the
//! OS event sources that drive the orchestrator.

mod commands;
mod desktop;
mod hotkey;
mod panel;
mod permissions;
mod tray;

use std::sync::Mutex;

use tauri::menu::CheckMenuItem;
use tauri::{AppHandle, Manager, Wry};

use crate::error::HintError;
use crate::hints::{Alphabet, Orchestrator, Pid, TimerToken};
use crate::platform::macos::{AppSwitchObserver, ClickListener};
use crate::settings::{self, Settings};
use desktop::MacDesktop;

pub struct HintState {
    orchestrator: Mutex<Orchestrator<MacDesktop>>,
    settings: Mutex<Settings>,
    mode_item: CheckMenuItem<Wry>,
    click_listener: Mutex<Option<ClickListener>>,
    app_switch: Mutex<Option<AppSwitchObserver>>,
}

impl HintState {
    fn with_orchestrator<T>(
        &self,
        f: impl FnOnce(&mut Orchestrator<MacDesktop>) -> T,
    ) -> Result<T, String> {
        let mut orchestrator = self.orchestrator.lock().map_err(|e| e.to_string())?;
        Ok(f(&mut orchestrator))
    }

    /// Reflect a mode change in the tray and persist it.
    fn mode_changed(&self, continuous: bool) {
        if let Err(err) = self.mode_item.set_checked(continuous) {
            tracing::warn!(%err, "failed to update tray check mark");
        }
        let Ok(mut settings) = self.settings.lock() else {
            return;
        };
        settings.continuous_mode = continuous;
        if let Err(err) = settings::save(&settings) {
            tracing::warn!(%err, "failed to save settings");
        }
    }

    /// The event tap needs accessibility access, so it is retried on every
    /// activation until it starts.
    fn ensure_click_listener(&self, app: &AppHandle) {
        let Ok(mut listener) = self.click_listener.lock() else {
            return;
        };
        if listener.is_some() {
            return;
        }
        let handle = app.clone();
        match ClickListener::start(move |_| {
            let inner = handle.clone();
            let _ = handle.run_on_main_thread(move || {
                if let Some(state) = inner.try_state::<HintState>() {
                    let _ = state.with_orchestrator(|o| o.on_external_click());
                }
            });
        }) {
            Ok(started) => *listener = Some(started),
            Err(err) => tracing::warn!(%err, "click monitor unavailable"),
        }
    }
}

pub(crate) fn show_hints(app: &AppHandle) {
    let Some(state) = app.try_state::<HintState>() else {
        return;
    };
    state.ensure_click_listener(app);
    match state.with_orchestrator(|o| o.on_activate()) {
        Ok(Ok(count)) => tracing::debug!(count, "hints shown"),
        Ok(Err(HintError::NotTrusted)) => permissions::open_accessibility_settings(),
        Ok(Err(_)) => {}
        Err(err) => tracing::error!(%err, "orchestrator unavailable"),
    }
}

fn fire_timer(app: &AppHandle, token: TimerToken) {
    if let Some(state) = app.try_state::<HintState>() {
        let _ = state.with_orchestrator(|o| o.on_timer(token));
    }
}

fn observe_app_switches(app: &AppHandle) {
    let Some(state) = app.try_state::<HintState>() else {
        return;
    };
    let Ok(mut slot) = state.app_switch.lock() else {
        return;
    };
    let handle = app.clone();
    *slot = Some(AppSwitchObserver::install(move |pid| {
        if let Some(state) = handle.try_state::<HintState>() {
            let _ = state.with_orchestrator(|o| o.on_app_activated(pid));
        }
    }));
}

pub fn run() {
    let settings = settings::load();
    tracing::info!(?settings, "starting");

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_nspanel::init())
        .plugin(hotkey::plugin(&settings.hotkey))
        .setup(move |app| {
            app.set_activation_policy(tauri::ActivationPolicy::Accessory);
            panel::init(app.handle())?;
            let mode_item = tray::create(app.handle(), settings.continuous_mode)?;

            let desktop = MacDesktop::new(app.handle().clone(), settings.click_hold());
            let orchestrator = Orchestrator::new(
                desktop,
                Alphabet::default(),
                settings.timing(),
                std::process::id() as Pid,
            )
            .with_continuous(settings.continuous_mode);

            app.manage(HintState {
                orchestrator: Mutex::new(orchestrator),
                settings: Mutex::new(settings),
                mode_item,
                click_listener: Mutex::new(None),
                app_switch: Mutex::new(None),
            });

            if permissions::prompt_if_untrusted() {
                if let Some(state) = app.try_state::<HintState>() {
                    state.ensure_click_listener(app.handle());
                }
            }
            observe_app_switches(app.handle());
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::hint_key,
            commands::hint_cancel,
            commands::hint_toggle_mode,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
