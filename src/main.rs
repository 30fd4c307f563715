use grid_editor::app::App;
use grid_editor::AppConfig;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("grid_editor=info")),
        )
        .init();

    let config = AppConfig::from_env().expect("should resolve database path and WebView2 data directory");
    tracing::info!(db = %config.db_path.display(), "starting grid editor");

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(dioxus::desktop::WindowBuilder::new().with_title("Grid Editor"))
                .with_data_directory(config.webview_data_dir),
        )
        .launch(App);
}
