//! Conversion between command-language text and typed setting values

use std::sync::OnceLock;

use nom::{
    branch::alt,
    character::complete::{char, multispace0, multispace1, one_of},
    combinator::{all_consuming, opt, recognize},
    multi::separated_list1,
    number::complete::float,
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

use crate::color::{color_index, color_name};
use crate::error::SettingError;
use crate::setting::{Setting, SettingType, SettingValue};
use crate::shortcut::{Lookup, Shortcut};

/// Words accepted wherever a boolean is expected
static BOOLEAN_WORDS: &[(&str, bool)] = &[
    ("true", true),
    ("false", false),
    ("on", true),
    ("off", false),
    ("1", true),
    ("0", false),
    ("1.0", true),
    ("0.0", false),
];

fn boolean_shortcut() -> &'static Shortcut {
    static TABLE: OnceLock<Shortcut> = OnceLock::new();
    TABLE.get_or_init(|| Shortcut::new(BOOLEAN_WORDS.iter().map(|(w, _)| *w)))
}

fn boolean_word(word: &str) -> Option<bool> {
    BOOLEAN_WORDS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, v)| *v)
}

/// Interpret a boolean word, allowing unique abbreviations (`of` → `off`)
pub fn parse_bool(text: &str) -> Option<bool> {
    let word = text.trim().to_ascii_lowercase();
    boolean_shortcut().interpret(&word).name().and_then(boolean_word)
}

/// Convert raw command text to a value of the setting's type
///
/// Numbers are accepted for booleans (non-zero is true) and boolean words
/// for numbers. Errors quote the raw text only.
pub fn parse_value(setting: &Setting, raw: &str) -> Result<SettingValue, SettingError> {
    let text = raw.trim();
    let invalid = || SettingError::invalid_value(raw);
    let lower = text.to_ascii_lowercase();

    match setting.setting_type {
        SettingType::Bool => match boolean_shortcut().interpret(&lower) {
            Lookup::Unknown => text
                .parse::<f64>()
                .map(|v| SettingValue::Bool(v != 0.0))
                .map_err(|_| invalid()),
            lookup => lookup
                .name()
                .and_then(boolean_word)
                .map(SettingValue::Bool)
                .ok_or_else(invalid),
        },
        SettingType::Int => match boolean_word(&lower) {
            Some(v) => Ok(SettingValue::Int(v as i32)),
            None => text.parse::<i32>().map(SettingValue::Int).map_err(|_| invalid()),
        },
        SettingType::Float => match boolean_word(&lower) {
            Some(v) => Ok(SettingValue::Float(if v { 1.0 } else { 0.0 })),
            None => text.parse::<f32>().map(SettingValue::Float).map_err(|_| invalid()),
        },
        SettingType::Float3 => parse_float3(text).map(SettingValue::Float3).ok_or_else(invalid),
        SettingType::Color => color_index(text).map(SettingValue::Color).ok_or_else(invalid),
        SettingType::String => Ok(SettingValue::String(strip_outer_quotes(text).to_string())),
        SettingType::Blank => Err(invalid()),
    }
}

fn float_list(input: &str) -> IResult<&str, Vec<f32>> {
    let separator = alt((
        recognize(tuple((multispace0, char(','), multispace0))),
        multispace1,
    ));
    delimited(
        pair(multispace0, opt(one_of("[("))),
        preceded(multispace0, separated_list1(separator, float)),
        tuple((multispace0, opt(one_of("])")), multispace0)),
    )(input)
}

/// Parse `x y z`, `x, y, z`, `[x, y, z]` or `(x, y, z)`; extra components are ignored
pub fn parse_float3(text: &str) -> Option<[f32; 3]> {
    let (_, values) = all_consuming(float_list)(text).ok()?;
    match values.as_slice() {
        [x, y, z, ..] => Some([*x, *y, *z]),
        _ => None,
    }
}

fn strip_outer_quotes(text: &str) -> &str {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'\'' || first == b'"') {
            return &text[1..text.len() - 1];
        }
    }
    text
}

/// Render a value the way `get` prints it
pub fn format_value(value: &SettingValue) -> String {
    match value {
        SettingValue::Bool(v) => if *v { "on" } else { "off" }.to_string(),
        SettingValue::Int(v) => format!("{}", v),
        SettingValue::Float(v) => format!("{:.5}", v),
        SettingValue::Float3([x, y, z]) => format!("[ {:.5}, {:.5}, {:.5} ]", x, y, z),
        SettingValue::Color(index) => color_name(*index).unwrap_or("invalid").to_string(),
        SettingValue::String(s) => s.clone(),
    }
}
