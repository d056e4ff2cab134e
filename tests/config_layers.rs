//! Layered configuration precedence, resolved through the public API.

use serde_json::json;
use winpack::packager::{
    ConfigLayer, ConfigStack, resolve_package_settings, resolve_win_options_for_host,
};

fn three_layer_stack() -> ConfigStack {
    ConfigStack::new()
        .push(ConfigLayer::new(
            "defaults",
            json!({
                "version": "0.0.0",
                "win": {"msi": false, "icon": "icon"}
            }),
        ))
        .push(ConfigLayer::new(
            "project",
            json!({
                "productName": "Test App",
                "version": "1.1.0",
                "win": {
                    "certificatePassword": "fromProject",
                    "squirrel": {"remoteReleases": "https://example.com/releases"}
                }
            }),
        ))
        .push(ConfigLayer::new(
            "invocation",
            json!({"win": {"msi": true, "certificatePassword": "fromInvocation"}}),
        ))
}

#[test]
fn invocation_layer_wins_over_project_and_defaults() {
    let merged = three_layer_stack().merged();
    let options = resolve_win_options_for_host(&merged, true).expect("valid options");

    // Field set only in the top layer
    assert_eq!(options.msi, Some(true));
    // Field set in two layers: top wins
    assert_eq!(options.certificate_password.as_deref(), Some("fromInvocation"));
    // Fields untouched by higher layers fall through
    assert_eq!(options.icon.as_deref(), Some("icon"));
    assert_eq!(
        options
            .squirrel
            .remote_releases
            .as_ref()
            .map(|u| u.as_str()),
        Some("https://example.com/releases")
    );
}

#[test]
fn package_metadata_falls_through_per_field() {
    let merged = three_layer_stack().merged();
    let package = resolve_package_settings(&merged).expect("valid package");

    assert_eq!(package.product_name, "Test App");
    // The project layer overrides the default version
    assert_eq!(package.version, "1.1.0");
}

#[test]
fn type_errors_survive_merging() {
    let merged = three_layer_stack()
        .push(ConfigLayer::new("broken", json!({"win": {"msi": "false"}})))
        .merged();

    let err = resolve_win_options_for_host(&merged, true).unwrap_err();
    assert_eq!(
        err.to_string(),
        "msi expected to be boolean value, but string '\"false\"' was specified"
    );
}
