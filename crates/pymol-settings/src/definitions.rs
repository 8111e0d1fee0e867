//! Setting definitions
//!
//! Indices match PyMOL's `SettingInfo.h` so that numeric setting references
//! in existing scripts keep working. The table is sorted by index.

use std::sync::OnceLock;

use crate::error::SettingError;
use crate::setting::{DefaultValue, Setting, SettingLevel, SettingType};
use crate::shortcut::{Lookup, Shortcut};

/// Setting indices
#[allow(non_upper_case_globals)]
pub mod id {
    pub const dot_density: u16 = 2;
    pub const solvent_radius: u16 = 4;
    pub const bg_rgb: u16 = 6;
    pub const ambient: u16 = 7;
    pub const direct: u16 = 8;
    pub const reflect: u16 = 9;
    pub const light: u16 = 10;
    pub const power: u16 = 11;
    pub const antialias: u16 = 12;
    pub const stick_radius: u16 = 21;
    pub const orthoscopic: u16 = 23;
    pub const spec_reflect: u16 = 24;
    pub const spec_power: u16 = 25;
    pub const surface_quality: u16 = 38;
    pub const line_width: u16 = 44;
    pub const all_states: u16 = 49;
    pub const auto_show_lines: u16 = 51;
    pub const dash_length: u16 = 58;
    pub const dash_gap: u16 = 59;
    pub const auto_zoom: u16 = 60;
    pub const text: u16 = 62;
    pub const valence: u16 = 64;
    pub const label_color: u16 = 66;
    pub const depth_cue: u16 = 84;
    pub const specular: u16 = 85;
    pub const shininess: u16 = 86;
    pub const fog: u16 = 88;
    pub const mesh_width: u16 = 90;
    pub const cartoon_loop_radius: u16 = 92;
    pub const cartoon_rect_width: u16 = 97;
    pub const internal_gui: u16 = 99;
    pub const cartoon_oval_length: u16 = 100;
    pub const ribbon_width: u16 = 106;
    pub const dash_width: u16 = 107;
    pub const cartoon_smooth_loops: u16 = 114;
    pub const cartoon_fancy_helices: u16 = 118;
    pub const internal_feedback: u16 = 128;
    pub const logging: u16 = 131;
    pub const log_conformations: u16 = 134;
    pub const ray_opaque_background: u16 = 137;
    pub const transparency: u16 = 138;
    pub const suspend_updates: u16 = 141;
    pub const surface_color: u16 = 144;
    pub const field_of_view: u16 = 152;
    pub const sphere_scale: u16 = 155;
    pub const two_sided_lighting: u16 = 156;
    pub const auto_remove_hydrogens: u16 = 158;
    pub const raise_exceptions: u16 = 159;
    pub const sphere_transparency: u16 = 172;
    pub const sphere_color: u16 = 173;
    pub const cartoon_cylindrical_helices: u16 = 180;
    pub const state: u16 = 193;
    pub const ray_shadow: u16 = 195;
    pub const stick_transparency: u16 = 198;
    pub const cartoon_color: u16 = 236;
    pub const pdb_use_ter_records: u16 = 268;
    pub const cartoon_transparency: u16 = 279;
    pub const pdb_retain_ids: u16 = 300;
    pub const label_font_id: u16 = 328;
    pub const seq_view: u16 = 353;
    pub const stick_color: u16 = 376;
    pub const cartoon_side_chain_helper: u16 = 383;
    pub const session_file: u16 = 440;
    pub const label_size: u16 = 453;
    pub const light_count: u16 = 455;
    pub const ray_trace_mode: u16 = 468;
    pub const fetch_path: u16 = 507;
    pub const movie_fps: u16 = 550;
    pub const dash_color: u16 = 574;
}

/// Names accepted in place of a current setting name
pub static LEGACY_NAMES: &[(&str, &str)] = &[("ray_shadows", "ray_shadow")];

macro_rules! s_bool {
    ($id:expr, $name:expr, $level:expr, $default:expr) => {
        Setting { id: $id, name: $name, setting_type: SettingType::Bool, level: $level, default: DefaultValue::Bool($default), min: Some(0.0), max: Some(1.0) }
    };
}

macro_rules! s_int {
    ($id:expr, $name:expr, $level:expr, $default:expr) => {
        Setting { id: $id, name: $name, setting_type: SettingType::Int, level: $level, default: DefaultValue::Int($default), min: None, max: None }
    };
    ($id:expr, $name:expr, $level:expr, $default:expr, $min:expr, $max:expr) => {
        Setting { id: $id, name: $name, setting_type: SettingType::Int, level: $level, default: DefaultValue::Int($default), min: Some($min as f32), max: Some($max as f32) }
    };
}

macro_rules! s_float {
    ($id:expr, $name:expr, $level:expr, $default:expr) => {
        Setting { id: $id, name: $name, setting_type: SettingType::Float, level: $level, default: DefaultValue::Float($default), min: None, max: None }
    };
}

macro_rules! s_float3 {
    ($id:expr, $name:expr, $level:expr, $x:expr, $y:expr, $z:expr) => {
        Setting { id: $id, name: $name, setting_type: SettingType::Float3, level: $level, default: DefaultValue::Float3([$x, $y, $z]), min: None, max: None }
    };
}

macro_rules! s_color {
    ($id:expr, $name:expr, $level:expr, $default:expr) => {
        Setting { id: $id, name: $name, setting_type: SettingType::Color, level: $level, default: DefaultValue::Color($default), min: None, max: None }
    };
}

macro_rules! s_string {
    ($id:expr, $name:expr, $level:expr, $default:expr) => {
        Setting { id: $id, name: $name, setting_type: SettingType::String, level: $level, default: DefaultValue::Str($default), min: None, max: None }
    };
}

use SettingLevel::*;

/// All known setting definitions, sorted by index
pub static SETTINGS: &[Setting] = &[
    s_int!(2, "dot_density", ObjectState, 2),
    s_float!(4, "solvent_radius", ObjectState, 1.4),
    s_color!(6, "bg_rgb", Global, 1),
    s_float!(7, "ambient", Global, 0.14),
    s_float!(8, "direct", Global, 0.45),
    s_float!(9, "reflect", Global, 0.45),
    s_float3!(10, "light", Global, -0.4, -0.4, -1.0),
    s_float!(11, "power", Global, 1.0),
    s_int!(12, "antialias", Global, 1),
    s_float!(21, "stick_radius", Bond, 0.25),
    s_bool!(23, "orthoscopic", Global, false),
    s_float!(24, "spec_reflect", Global, -1.0),
    s_float!(25, "spec_power", Global, -1.0),
    s_int!(38, "surface_quality", ObjectState, 0),
    s_float!(44, "line_width", Bond, 1.49),
    s_bool!(49, "all_states", Object, false),
    s_bool!(51, "auto_show_lines", Global, true),
    s_float!(58, "dash_length", ObjectState, 0.15),
    s_float!(59, "dash_gap", ObjectState, 0.45),
    s_int!(60, "auto_zoom", Global, -1),
    s_bool!(62, "text", Global, false),
    s_bool!(64, "valence", Bond, true),
    s_color!(66, "label_color", Atom, -6),
    s_bool!(84, "depth_cue", Global, true),
    s_float!(85, "specular", Global, 1.0),
    s_float!(86, "shininess", Global, 55.0),
    s_float!(88, "fog", Global, 1.0),
    s_float!(90, "mesh_width", ObjectState, 1.0),
    s_float!(92, "cartoon_loop_radius", ObjectState, 0.2),
    s_float!(97, "cartoon_rect_width", ObjectState, 0.4),
    s_bool!(99, "internal_gui", Object, true),
    s_float!(100, "cartoon_oval_length", ObjectState, 1.35),
    s_float!(106, "ribbon_width", ObjectState, 3.0),
    s_float!(107, "dash_width", ObjectState, 2.5),
    s_bool!(114, "cartoon_smooth_loops", ObjectState, false),
    s_bool!(118, "cartoon_fancy_helices", ObjectState, false),
    s_int!(128, "internal_feedback", Global, 1),
    s_int!(131, "logging", Global, 0, 0, 2),
    s_bool!(134, "log_conformations", Global, true),
    s_int!(137, "ray_opaque_background", Global, -1),
    s_float!(138, "transparency", Atom, 0.0),
    s_bool!(141, "suspend_updates", Global, false),
    s_color!(144, "surface_color", Atom, -1),
    s_float!(152, "field_of_view", Global, 20.0),
    s_float!(155, "sphere_scale", Atom, 1.0),
    s_int!(156, "two_sided_lighting", ObjectState, -1),
    s_bool!(158, "auto_remove_hydrogens", Global, false),
    s_bool!(159, "raise_exceptions", Unused, true),
    s_float!(172, "sphere_transparency", Atom, 0.0),
    s_color!(173, "sphere_color", Atom, -1),
    s_int!(180, "cartoon_cylindrical_helices", ObjectState, 0, 0, 2),
    s_int!(193, "state", Object, 1),
    s_bool!(195, "ray_shadow", Global, true),
    s_float!(198, "stick_transparency", Bond, 0.0),
    s_color!(236, "cartoon_color", Atom, -1),
    s_int!(268, "pdb_use_ter_records", Global, 1),
    s_float!(279, "cartoon_transparency", Atom, 0.0),
    s_bool!(300, "pdb_retain_ids", Global, false),
    s_int!(328, "label_font_id", ObjectState, 5),
    s_bool!(353, "seq_view", Object, false),
    s_color!(376, "stick_color", Bond, -1),
    s_bool!(383, "cartoon_side_chain_helper", Atom, false),
    s_string!(440, "session_file", Global, ""),
    s_float!(453, "label_size", ObjectState, 14.0),
    s_int!(455, "light_count", Global, 2, 1, 10),
    s_int!(468, "ray_trace_mode", Global, 0),
    s_string!(507, "fetch_path", Global, "."),
    s_float!(550, "movie_fps", Global, 30.0),
    s_color!(574, "dash_color", ObjectState, -1),
];

/// Get a setting definition by index
pub fn get_setting(id: u16) -> Option<&'static Setting> {
    SETTINGS
        .binary_search_by_key(&id, |s| s.id)
        .ok()
        .map(|i| &SETTINGS[i])
}

/// Get a setting index by exact name (legacy names included)
pub fn get_setting_id(name: &str) -> Option<u16> {
    let name = LEGACY_NAMES
        .iter()
        .find(|(old, _)| *old == name)
        .map_or(name, |(_, new)| new);
    SETTINGS.iter().find(|s| s.name == name).map(|s| s.id)
}

/// Get a list of all setting names
///
/// Useful for abbreviation matching and listings.
pub fn setting_names() -> Vec<&'static str> {
    SETTINGS
        .iter()
        .filter(|s| s.setting_type != SettingType::Blank)
        .map(|s| s.name)
        .collect()
}

fn name_shortcut() -> &'static Shortcut {
    static TABLE: OnceLock<Shortcut> = OnceLock::new();
    TABLE.get_or_init(|| Shortcut::new(setting_names()))
}

/// Resolve a setting reference typed by a user
///
/// Accepts an index (`"23"`), a full or legacy name, or a unique prefix of a
/// name. Ambiguous prefixes and unknown names are errors.
pub fn resolve_setting(name: &str) -> Result<&'static Setting, SettingError> {
    let name = name.trim();
    if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) {
        return name
            .parse::<u16>()
            .ok()
            .and_then(get_setting)
            .ok_or_else(|| SettingError::not_found_name(name));
    }
    if let Some(setting) = get_setting_id(name).and_then(get_setting) {
        return Ok(setting);
    }
    match name_shortcut().interpret(name) {
        Lookup::Exact(full) | Lookup::Unique(full) => get_setting_id(full)
            .and_then(get_setting)
            .ok_or_else(|| SettingError::not_found_name(name)),
        Lookup::Ambiguous(candidates) => Err(SettingError::Ambiguous {
            name: name.to_string(),
            candidates: candidates.into_iter().map(str::to_string).collect(),
        }),
        Lookup::Unknown => Err(SettingError::not_found_name(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_sorted_and_consistent() {
        for pair in SETTINGS.windows(2) {
            assert!(pair[0].id < pair[1].id, "{} out of order", pair[1].name);
        }
        assert_eq!(get_setting(id::sphere_scale).map(|s| s.name), Some("sphere_scale"));
        assert_eq!(get_setting(id::dash_color).map(|s| s.name), Some("dash_color"));
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(get_setting_id("orthoscopic"), Some(id::orthoscopic));
        assert_eq!(get_setting_id("ray_shadows"), Some(id::ray_shadow));
        assert_eq!(get_setting_id("no_such_setting"), None);
        assert!(get_setting(1).is_none());
    }

    #[test]
    fn test_resolve_setting() {
        assert_eq!(resolve_setting("23").unwrap().name, "orthoscopic");
        assert_eq!(resolve_setting("orth").unwrap().name, "orthoscopic");
        assert_eq!(resolve_setting("ray_shadows").unwrap().id, id::ray_shadow);
        assert!(matches!(
            resolve_setting("cartoon_"),
            Err(SettingError::Ambiguous { .. })
        ));
        assert!(matches!(resolve_setting("bogus"), Err(SettingError::NotFound(_))));
        assert!(matches!(resolve_setting("9999"), Err(SettingError::NotFound(_))));
    }
}
