//! Ordered configuration sources and field-by-field merge.
//!
//! Configuration is supplied as an explicit, ordered list of layers.
//! Precedence is defined purely by layer order: a later layer wins over an
//! earlier one, field by field. Objects merge recursively; scalars and
//! arrays in a later layer replace the earlier value outright. A field
//! missing from a later layer falls through to the value below it.

use serde_json::Value;

/// One named source of raw configuration.
///
/// Typical layers, lowest precedence first: built-in defaults, the project
/// configuration file, per-invocation overrides.
#[derive(Debug, Clone)]
pub struct ConfigLayer {
    name: String,
    values: Value,
}

impl ConfigLayer {
    /// Creates a layer from a raw configuration tree.
    ///
    /// Non-object trees are accepted but only object roots participate in
    /// merging; anything else replaces wholesale.
    pub fn new(name: impl Into<String>, values: Value) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Returns the layer name (used in logs only).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the raw value tree of this layer.
    pub fn values(&self) -> &Value {
        &self.values
    }
}

/// Ordered stack of configuration layers.
#[derive(Debug, Clone, Default)]
pub struct ConfigStack {
    layers: Vec<ConfigLayer>,
}

impl ConfigStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a layer on top of the stack. The pushed layer takes
    /// precedence over every layer already present.
    pub fn push(mut self, layer: ConfigLayer) -> Self {
        log::debug!("config layer added: {}", layer.name());
        self.layers.push(layer);
        self
    }

    /// Merges all layers into a single effective tree.
    pub fn merged(&self) -> Value {
        let mut effective = Value::Object(Default::default());
        for layer in &self.layers {
            merge_into(&mut effective, layer.values());
        }
        effective
    }
}

/// Deep-merges `overlay` into `base`.
///
/// Object values merge key by key; everything else (scalars, arrays, null)
/// replaces the base value.
fn merge_into(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(base_value) if base_value.is_object() && overlay_value.is_object() => {
                        merge_into(base_value, overlay_value);
                    }
                    _ => {
                        base_map.insert(key.clone(), overlay_value.clone());
                    }
                }
            }
        }
        (base, overlay) => {
            *base = overlay.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn later_layer_wins_field_by_field() {
        let merged = ConfigStack::new()
            .push(ConfigLayer::new(
                "defaults",
                json!({"win": {"msi": false, "icon": "icon"}}),
            ))
            .push(ConfigLayer::new("project", json!({"win": {"msi": true}})))
            .merged();

        assert_eq!(merged["win"]["msi"], json!(true));
        // Untouched fields fall through to the lower layer.
        assert_eq!(merged["win"]["icon"], json!("icon"));
    }

    #[test]
    fn objects_merge_but_scalars_replace() {
        let merged = ConfigStack::new()
            .push(ConfigLayer::new(
                "project",
                json!({"win": {"squirrel": {"msi": true, "remoteReleases": "https://a.example"}}}),
            ))
            .push(ConfigLayer::new(
                "invocation",
                json!({"win": {"squirrel": {"msi": false}}}),
            ))
            .merged();

        assert_eq!(merged["win"]["squirrel"]["msi"], json!(false));
        assert_eq!(
            merged["win"]["squirrel"]["remoteReleases"],
            json!("https://a.example")
        );
    }

    #[test]
    fn empty_stack_merges_to_empty_object() {
        assert_eq!(ConfigStack::new().merged(), json!({}));
    }
}
