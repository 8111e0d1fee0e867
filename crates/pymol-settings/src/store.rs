//! Setting storage with object and state overrides
//!
//! Values are looked up from the most specific scope outwards:
//! object-state, then object, then the global layer, then the default
//! from the definition table.

use std::fmt;

use ahash::AHashMap;
use parking_lot::RwLock;

use crate::convert::{format_value, parse_value};
use crate::definitions::{get_setting, resolve_setting};
use crate::error::SettingError;
use crate::setting::{Setting, SettingValue};

/// Where a value is stored
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SettingScope {
    /// Session-wide
    Global,
    /// A named object
    Object(String),
    /// One state (1-based) of a named object
    State(String, i32),
}

impl SettingScope {
    /// Scope for an optional object name and state, as typed by users.
    ///
    /// A state of 0 means "all states" and selects the object layer.
    pub fn from_parts(object: Option<&str>, state: i32) -> Self {
        match object {
            None => SettingScope::Global,
            Some(name) if state > 0 => SettingScope::State(name.to_string(), state),
            Some(name) => SettingScope::Object(name.to_string()),
        }
    }

    /// Object name, if any
    pub fn object(&self) -> Option<&str> {
        match self {
            SettingScope::Global => None,
            SettingScope::Object(name) | SettingScope::State(name, _) => Some(name),
        }
    }
}

impl fmt::Display for SettingScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingScope::Global => write!(f, "global"),
            SettingScope::Object(name) => write!(f, "object {}", name),
            SettingScope::State(name, state) => write!(f, "object {} state {}", name, state),
        }
    }
}

type Overrides = AHashMap<u16, SettingValue>;

#[derive(Debug, Default, Clone)]
struct Layers {
    global: Overrides,
    objects: AHashMap<String, Overrides>,
    states: AHashMap<(String, i32), Overrides>,
}

impl Layers {
    fn layer(&self, scope: &SettingScope) -> Option<&Overrides> {
        match scope {
            SettingScope::Global => Some(&self.global),
            SettingScope::Object(name) => self.objects.get(name),
            SettingScope::State(name, state) => self.states.get(&(name.clone(), *state)),
        }
    }

    fn layer_mut(&mut self, scope: &SettingScope) -> &mut Overrides {
        match scope {
            SettingScope::Global => &mut self.global,
            SettingScope::Object(name) => self.objects.entry(name.clone()).or_default(),
            SettingScope::State(name, state) => {
                self.states.entry((name.clone(), *state)).or_default()
            }
        }
    }

    fn lookup(&self, id: u16, scope: &SettingScope) -> Option<&SettingValue> {
        let from = |scope: &SettingScope| self.layer(scope).and_then(|l| l.get(&id));
        match scope {
            SettingScope::Global => from(scope),
            SettingScope::Object(_) => from(scope).or_else(|| from(&SettingScope::Global)),
            SettingScope::State(name, _) => from(scope)
                .or_else(|| from(&SettingScope::Object(name.clone())))
                .or_else(|| from(&SettingScope::Global)),
        }
    }
}

/// Thread-safe settings store
///
/// Shared by every command of a session; readers never block each other.
#[derive(Debug, Default)]
pub struct SettingStore {
    layers: RwLock<Layers>,
}

impl SettingStore {
    /// Create a store holding only defaults
    pub fn new() -> Self {
        Self::default()
    }

    fn checked(
        setting: &Setting,
        value: SettingValue,
        scope: &SettingScope,
    ) -> Result<SettingValue, SettingError> {
        let allowed = match scope {
            SettingScope::Global => true,
            SettingScope::Object(_) => setting.level.allows_object(),
            SettingScope::State(..) => setting.level.allows_state(),
        };
        if !allowed {
            return Err(SettingError::LevelMismatch {
                name: setting.name.to_string(),
                level: scope.to_string(),
            });
        }

        let actual = value.setting_type().name();
        let value = value
            .coerce(setting.setting_type)
            .ok_or(SettingError::TypeMismatch {
                expected: setting.setting_type.name(),
                actual,
            })?;

        if setting.has_range() {
            if let Some(v) = value.as_float() {
                if !setting.is_in_range(v) {
                    return Err(SettingError::OutOfRange {
                        name: setting.name.to_string(),
                        reason: format!(
                            "value {} is outside range [{}, {}]",
                            v,
                            setting.min.unwrap_or(v),
                            setting.max.unwrap_or(v)
                        ),
                    });
                }
            }
        }
        Ok(value)
    }

    /// Store a typed value
    pub fn set(
        &self,
        id: u16,
        value: SettingValue,
        scope: &SettingScope,
    ) -> Result<(), SettingError> {
        let setting = get_setting(id).ok_or_else(|| SettingError::not_found_id(id))?;
        let value = Self::checked(setting, value, scope)?;
        log::trace!("set {} = {:?} ({})", setting.name, value, scope);
        self.layers.write().layer_mut(scope).insert(id, value);
        Ok(())
    }

    /// Resolve a setting name and store a value given as command text
    pub fn set_text(
        &self,
        name: &str,
        raw: &str,
        scope: &SettingScope,
    ) -> Result<&'static Setting, SettingError> {
        let setting = resolve_setting(name)?;
        let value = parse_value(setting, raw)?;
        self.set(setting.id, value, scope)?;
        Ok(setting)
    }

    /// Effective value in a scope, falling back to outer scopes and the default
    pub fn get(&self, id: u16, scope: &SettingScope) -> Option<SettingValue> {
        let setting = get_setting(id)?;
        self.layers
            .read()
            .lookup(id, scope)
            .cloned()
            .or_else(|| Some(setting.default_value()))
    }

    /// Value stored directly in a scope, without fallback
    pub fn get_defined(&self, id: u16, scope: &SettingScope) -> Option<SettingValue> {
        self.layers
            .read()
            .layer(scope)
            .and_then(|l| l.get(&id))
            .cloned()
    }

    /// Effective value rendered as text
    pub fn get_text(&self, id: u16, scope: &SettingScope) -> Option<String> {
        self.get(id, scope).map(|v| format_value(&v))
    }

    /// Remove a stored value.
    ///
    /// On the global layer this restores the default. Returns whether
    /// anything was removed.
    pub fn unset(&self, id: u16, scope: &SettingScope) -> Result<bool, SettingError> {
        if get_setting(id).is_none() {
            return Err(SettingError::not_found_id(id));
        }
        let mut layers = self.layers.write();
        let removed = match scope {
            SettingScope::Global => layers.global.remove(&id).is_some(),
            SettingScope::Object(name) => layers
                .objects
                .get_mut(name)
                .map_or(false, |l| l.remove(&id).is_some()),
            SettingScope::State(name, state) => layers
                .states
                .get_mut(&(name.clone(), *state))
                .map_or(false, |l| l.remove(&id).is_some()),
        };
        Ok(removed)
    }

    /// Drop every override belonging to an object
    pub fn remove_object(&self, name: &str) {
        let mut layers = self.layers.write();
        layers.objects.remove(name);
        layers.states.retain(|(object, _), _| object != name);
    }

    /// Settings stored directly in a scope, sorted by index
    pub fn defined_in(&self, scope: &SettingScope) -> Vec<(u16, SettingValue)> {
        let layers = self.layers.read();
        let mut defined: Vec<_> = layers
            .layer(scope)
            .map(|l| l.iter().map(|(id, v)| (*id, v.clone())).collect())
            .unwrap_or_default();
        defined.sort_by_key(|(id, _)| *id);
        defined
    }

    /// Forget every stored value
    pub fn reset_all(&self) {
        *self.layers.write() = Layers::default();
    }

    /// Global boolean value
    pub fn get_bool(&self, id: u16) -> bool {
        self.get(id, &SettingScope::Global)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    /// Global integer value
    pub fn get_int(&self, id: u16) -> i32 {
        self.get(id, &SettingScope::Global)
            .and_then(|v| v.as_int())
            .unwrap_or(0)
    }

    /// Global float value
    pub fn get_float(&self, id: u16) -> f32 {
        self.get(id, &SettingScope::Global)
            .and_then(|v| v.as_float())
            .unwrap_or(0.0)
    }
}

impl Clone for SettingStore {
    fn clone(&self) -> Self {
        SettingStore {
            layers: RwLock::new(self.layers.read().clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::id;

    fn obj(name: &str) -> SettingScope {
        SettingScope::Object(name.to_string())
    }

    #[test]
    fn test_defaults_and_global_set() {
        let store = SettingStore::new();
        assert!(!store.get_bool(id::orthoscopic));
        store.set(id::orthoscopic, true.into(), &SettingScope::Global).unwrap();
        assert!(store.get_bool(id::orthoscopic));
        assert_eq!(store.get_text(id::orthoscopic, &SettingScope::Global).unwrap(), "on");
    }

    #[test]
    fn test_fallback_chain() {
        let store = SettingStore::new();
        let state = SettingScope::State("prot".to_string(), 2);

        assert_eq!(store.get(id::sphere_scale, &state), Some(SettingValue::Float(1.0)));
        store.set(id::sphere_scale, 0.8f32.into(), &SettingScope::Global).unwrap();
        assert_eq!(store.get(id::sphere_scale, &state), Some(SettingValue::Float(0.8)));
        store.set(id::sphere_scale, 0.5f32.into(), &obj("prot")).unwrap();
        assert_eq!(store.get(id::sphere_scale, &state), Some(SettingValue::Float(0.5)));
        store.set(id::sphere_scale, 0.3f32.into(), &state).unwrap();
        assert_eq!(store.get(id::sphere_scale, &state), Some(SettingValue::Float(0.3)));

        // Other objects only see the global layer
        assert_eq!(store.get(id::sphere_scale, &obj("lig")), Some(SettingValue::Float(0.8)));
    }

    #[test]
    fn test_unset_restores_outer_value() {
        let store = SettingStore::new();
        store.set(id::sphere_scale, 0.5f32.into(), &obj("prot")).unwrap();
        assert!(store.unset(id::sphere_scale, &obj("prot")).unwrap());
        assert!(!store.unset(id::sphere_scale, &obj("prot")).unwrap());
        assert_eq!(store.get(id::sphere_scale, &obj("prot")), Some(SettingValue::Float(1.0)));

        store.set(id::ambient, 0.3f32.into(), &SettingScope::Global).unwrap();
        store.unset(id::ambient, &SettingScope::Global).unwrap();
        assert_eq!(store.get_float(id::ambient), 0.14);
    }

    #[test]
    fn test_level_and_type_checks() {
        let store = SettingStore::new();
        assert!(matches!(
            store.set(id::orthoscopic, true.into(), &obj("prot")),
            Err(SettingError::LevelMismatch { .. })
        ));
        assert!(matches!(
            store.set(id::state, SettingValue::Int(2), &SettingScope::State("prot".into(), 1)),
            Err(SettingError::LevelMismatch { .. })
        ));
        assert!(matches!(
            store.set(id::light, 1.0f32.into(), &SettingScope::Global),
            Err(SettingError::TypeMismatch { expected: "float3", actual: "float" })
        ));
        assert!(matches!(
            store.set(id::light_count, SettingValue::Int(20), &SettingScope::Global),
            Err(SettingError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_set_text() {
        let store = SettingStore::new();
        let setting = store.set_text("bg_rgb", "white", &SettingScope::Global).unwrap();
        assert_eq!(setting.id, id::bg_rgb);
        assert_eq!(store.get_text(id::bg_rgb, &SettingScope::Global).unwrap(), "white");

        store.set_text("light", "[0, 0, -1]", &SettingScope::Global).unwrap();
        assert_eq!(
            store.get_text(id::light, &SettingScope::Global).unwrap(),
            "[ 0.00000, 0.00000, -1.00000 ]"
        );
        assert!(store.set_text("sphere_scale", "huge", &SettingScope::Global).is_err());
    }

    #[test]
    fn test_remove_object_and_defined_in() {
        let store = SettingStore::new();
        store.set(id::sphere_scale, 0.5f32.into(), &obj("prot")).unwrap();
        store.set(id::dash_gap, 0.2f32.into(), &obj("prot")).unwrap();
        store
            .set(id::dash_gap, 0.1f32.into(), &SettingScope::State("prot".into(), 3))
            .unwrap();

        let defined: Vec<u16> = store
            .defined_in(&obj("prot"))
            .into_iter()
            .map(|(i, _)| i)
            .collect();
        assert_eq!(defined, vec![id::dash_gap, id::sphere_scale]);

        store.remove_object("prot");
        assert!(store.defined_in(&obj("prot")).is_empty());
        assert!(store
            .get_defined(id::dash_gap, &SettingScope::State("prot".into(), 3))
            .is_none());
    }

    #[test]
    fn test_scope_from_parts() {
        assert_eq!(SettingScope::from_parts(None, 3), SettingScope::Global);
        assert_eq!(SettingScope::from_parts(Some("a"), 0), obj("a"));
        assert_eq!(
            SettingScope::from_parts(Some("a"), 2),
            SettingScope::State("a".to_string(), 2)
        );
    }
}
