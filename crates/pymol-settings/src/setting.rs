//! Setting definitions and value types

use std::fmt;

/// Type of a setting value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SettingType {
    /// Unused/placeholder setting
    Blank = 0,
    /// Boolean value
    Bool = 1,
    /// Integer value
    Int = 2,
    /// Single float value
    Float = 3,
    /// Three-component float vector (e.g., positions, light directions)
    Float3 = 4,
    /// Color index
    Color = 5,
    /// String value
    String = 6,
}

impl SettingType {
    /// Get the display name for this type
    pub fn name(&self) -> &'static str {
        match self {
            SettingType::Blank => "blank",
            SettingType::Bool => "bool",
            SettingType::Int => "int",
            SettingType::Float => "float",
            SettingType::Float3 => "float3",
            SettingType::Color => "color",
            SettingType::String => "string",
        }
    }
}

impl fmt::Display for SettingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Setting level - determines where a setting can be applied
///
/// Settings follow a hierarchical inheritance model:
/// - `global` < `object` < `object-state`
/// - `object-state` < `atom` < `atom-state`
/// - `object-state` < `bond` < `bond-state`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SettingLevel {
    /// Deprecated/unused settings
    Unused = 0,
    /// Global settings (affect entire session)
    Global = 1,
    /// Per-object settings
    Object = 2,
    /// Per-object-state settings
    ObjectState = 3,
    /// Per-atom settings
    Atom = 4,
    /// Per-atom-state settings
    AtomState = 5,
    /// Per-bond settings
    Bond = 6,
    /// Per-bond-state settings
    BondState = 7,
}

impl SettingLevel {
    /// Get the display name for this level
    pub fn name(&self) -> &'static str {
        match self {
            SettingLevel::Unused => "unused",
            SettingLevel::Global => "global",
            SettingLevel::Object => "object",
            SettingLevel::ObjectState => "object-state",
            SettingLevel::Atom => "atom",
            SettingLevel::AtomState => "atom-state",
            SettingLevel::Bond => "bond",
            SettingLevel::BondState => "bond-state",
        }
    }

    /// Whether a setting of this level may be overridden per object
    pub fn allows_object(&self) -> bool {
        !matches!(self, SettingLevel::Unused | SettingLevel::Global)
    }

    /// Whether a setting of this level may be overridden per object-state
    pub fn allows_state(&self) -> bool {
        self.allows_object() && *self != SettingLevel::Object
    }
}

impl fmt::Display for SettingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A setting value
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i32),
    /// Single float value
    Float(f32),
    /// Three-component float vector
    Float3([f32; 3]),
    /// Color index (negative values are the special colors, see [`crate::color`])
    Color(i32),
    /// String value
    String(String),
}

impl SettingValue {
    /// Get the type of this value
    pub fn setting_type(&self) -> SettingType {
        match self {
            SettingValue::Bool(_) => SettingType::Bool,
            SettingValue::Int(_) => SettingType::Int,
            SettingValue::Float(_) => SettingType::Float,
            SettingValue::Float3(_) => SettingType::Float3,
            SettingValue::Color(_) => SettingType::Color,
            SettingValue::String(_) => SettingType::String,
        }
    }

    /// Try to get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(v) => Some(*v),
            SettingValue::Int(v) => Some(*v != 0),
            SettingValue::Float(v) => Some(*v != 0.0),
            _ => None,
        }
    }

    /// Try to get as int
    pub fn as_int(&self) -> Option<i32> {
        match self {
            SettingValue::Int(v) => Some(*v),
            SettingValue::Bool(v) => Some(if *v { 1 } else { 0 }),
            SettingValue::Float(v) => Some(*v as i32),
            SettingValue::Color(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as float
    pub fn as_float(&self) -> Option<f32> {
        match self {
            SettingValue::Float(v) => Some(*v),
            SettingValue::Int(v) => Some(*v as f32),
            SettingValue::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Try to get as float3
    pub fn as_float3(&self) -> Option<[f32; 3]> {
        match self {
            SettingValue::Float3(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as color index
    pub fn as_color(&self) -> Option<i32> {
        match self {
            SettingValue::Color(v) => Some(*v),
            SettingValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            SettingValue::String(v) => Some(v),
            _ => None,
        }
    }

    /// Check if this value can be stored in a setting of the target type
    pub fn is_compatible_with(&self, target_type: SettingType) -> bool {
        match (self, target_type) {
            (SettingValue::Bool(_), SettingType::Bool) => true,
            (SettingValue::Int(_), SettingType::Int) => true,
            (SettingValue::Float(_), SettingType::Float) => true,
            (SettingValue::Float3(_), SettingType::Float3) => true,
            (SettingValue::Color(_), SettingType::Color) => true,
            (SettingValue::String(_), SettingType::String) => true,
            (SettingValue::Bool(_), SettingType::Int) => true,
            (SettingValue::Int(_), SettingType::Bool) => true,
            (SettingValue::Int(_), SettingType::Color) => true,
            (SettingValue::Int(_), SettingType::Float) => true,
            (SettingValue::Bool(_), SettingType::Float) => true,
            _ => false,
        }
    }

    /// Convert a compatible value to the exact representation of `target_type`
    pub fn coerce(self, target_type: SettingType) -> Option<SettingValue> {
        if !self.is_compatible_with(target_type) {
            return None;
        }
        match target_type {
            SettingType::Bool => self.as_bool().map(SettingValue::Bool),
            SettingType::Int => self.as_int().map(SettingValue::Int),
            SettingType::Float => self.as_float().map(SettingValue::Float),
            SettingType::Color => self.as_color().map(SettingValue::Color),
            SettingType::Float3 | SettingType::String => Some(self),
            SettingType::Blank => None,
        }
    }
}

impl From<bool> for SettingValue {
    fn from(v: bool) -> Self {
        SettingValue::Bool(v)
    }
}

impl From<i32> for SettingValue {
    fn from(v: i32) -> Self {
        SettingValue::Int(v)
    }
}

impl From<f32> for SettingValue {
    fn from(v: f32) -> Self {
        SettingValue::Float(v)
    }
}

impl From<[f32; 3]> for SettingValue {
    fn from(v: [f32; 3]) -> Self {
        SettingValue::Float3(v)
    }
}

impl From<String> for SettingValue {
    fn from(v: String) -> Self {
        SettingValue::String(v)
    }
}

impl From<&str> for SettingValue {
    fn from(v: &str) -> Self {
        SettingValue::String(v.to_string())
    }
}

/// Default value of a setting, representable in a `static` table
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Float3([f32; 3]),
    Color(i32),
    Str(&'static str),
}

impl DefaultValue {
    /// Materialize as an owned setting value
    pub fn to_value(self) -> SettingValue {
        match self {
            DefaultValue::Bool(v) => SettingValue::Bool(v),
            DefaultValue::Int(v) => SettingValue::Int(v),
            DefaultValue::Float(v) => SettingValue::Float(v),
            DefaultValue::Float3(v) => SettingValue::Float3(v),
            DefaultValue::Color(v) => SettingValue::Color(v),
            DefaultValue::Str(v) => SettingValue::String(v.to_string()),
        }
    }
}

/// Metadata for a setting definition
#[derive(Debug, Clone)]
pub struct Setting {
    /// Index of the setting (stable across versions for script compatibility)
    pub id: u16,
    /// Name of the setting (e.g., "sphere_scale")
    pub name: &'static str,
    /// Type of the setting
    pub setting_type: SettingType,
    /// Level at which this setting can be applied
    pub level: SettingLevel,
    /// Default value
    pub default: DefaultValue,
    /// Minimum value (for numeric types)
    pub min: Option<f32>,
    /// Maximum value (for numeric types)
    pub max: Option<f32>,
}

impl Setting {
    /// Check if this setting has min/max constraints
    pub fn has_range(&self) -> bool {
        self.min.is_some() && self.max.is_some() && self.min != self.max
    }

    /// Check if a value is within the valid range for this setting
    pub fn is_in_range(&self, value: f32) -> bool {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min != max => value >= min && value <= max,
            _ => true,
        }
    }

    /// Default value as an owned setting value
    pub fn default_value(&self) -> SettingValue {
        self.default.to_value()
    }
}
