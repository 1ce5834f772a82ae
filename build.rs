fn main() {
    #[cfg(target_os = "macos")]
    {
        let manifest = tauri_build::AppManifest::new().commands(&[
            "hint_key",
            "hint_cancel",
            "hint_toggle_mode",
        ]);

        let attrs = tauri_build::Attributes::new().app_manifest(manifest);
        tauri_build::try_build(attrs).expect("failed to run build script");
    }
}
