//! Configuration engine for a dual-handle range slider.
//!
//! Merges partial user options over built-in defaults, coerces numeric fields
//! that arrive as strings (markup attributes), derives discrete-value
//! metadata, and clamps everything into a mutually consistent state. The
//! percent-to-value math lives in [`utils`].

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

pub mod config;
pub mod utils;

use crate::config::{
    DEFAULT_GRID_NUM, DEFAULT_MAX, DEFAULT_MIN, DEFAULT_STEP, INPUT_VALUES_SEPARATOR,
    PRETTIFY_SEPARATOR, VALUES_SEPARATOR,
};
use crate::utils::parse_number_prefix;

/// Slider mode: one handle or two.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SliderType {
    #[default]
    Single,
    Double,
}

/// Visual skin, carried through to the rendering layer untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkinType {
    #[default]
    Flat,
    Big,
    Modern,
    Round,
    Sharp,
    Square,
}

/// A number-or-string union: discrete value entries, parsed input tokens and
/// string-coercible option fields all take this shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SliderValue {
    Num(f64),
    Label(String),
}

impl SliderValue {
    /// Parse a raw token: leading numeric prefix wins, anything else stays a
    /// label.
    pub fn parse(token: &str) -> Self {
        match parse_number_prefix(token) {
            Some(number) => SliderValue::Num(number),
            None => SliderValue::Label(token.to_string()),
        }
    }

    /// Numeric view of the value, `parseFloat` semantics for labels.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            SliderValue::Num(number) if !number.is_nan() => Some(*number),
            SliderValue::Num(_) => None,
            SliderValue::Label(text) => parse_number_prefix(text),
        }
    }
}

/// Caller-supplied display formatter, substitutable for the default
/// thousands-grouping one.
#[derive(Clone)]
pub struct PrettifyFn(Rc<dyn Fn(f64) -> String>);

impl PrettifyFn {
    pub fn new(formatter: impl Fn(f64) -> String + 'static) -> Self {
        PrettifyFn(Rc::new(formatter))
    }

    pub fn call(&self, value: f64) -> String {
        (self.0)(value)
    }
}

impl fmt::Debug for PrettifyFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrettifyFn")
    }
}

/// Previous resolved handle positions, passed on re-validation so the handle
/// the caller did not move is never silently dragged.
#[derive(Clone, Copy, Debug)]
pub struct UpdateCheck {
    pub from: f64,
    pub to: f64,
}

// Configuration errors. Everything else anomalous (unparsable strings,
// inverted ranges, out-of-range handles) is corrected silently.
#[derive(Debug)]
pub enum ConfigError {
    /// The serialized input-values string did not split into two non-empty
    /// tokens on the configured separator.
    InputValues { separator: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InputValues { separator } => write!(
                f,
                "input values must contain two entries separated by '{}'",
                separator
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Fully resolved slider configuration.
///
/// Optional numeric fields model the "unset" state explicitly; after
/// [`check_configuration`] runs, `from`, `to`, `min_interval` and
/// `max_interval` are always `Some`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderConfig {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub from: Option<f64>,
    pub to: Option<f64>,
    pub from_min: Option<f64>,
    pub from_max: Option<f64>,
    pub to_min: Option<f64>,
    pub to_max: Option<f64>,
    pub min_interval: Option<f64>,
    pub max_interval: Option<f64>,
    #[serde(rename = "type")]
    pub slider_type: SliderType,
    pub skin: SkinType,
    /// Discrete value table; when non-empty the slider addresses positions by
    /// index and `min`/`max`/`step`/`grid_num`/`grid_snap` are derived.
    pub values: Vec<SliderValue>,
    /// Display strings parallel to `values`, derived by
    /// [`update_pretty_values`].
    pub pretty_values: Vec<String>,
    pub prettify_enabled: bool,
    pub prettify_separator: String,
    #[serde(skip)]
    pub prettify: Option<PrettifyFn>,
    pub input_values_separator: String,
    pub values_separator: String,
    pub grid: bool,
    pub grid_margin: bool,
    pub grid_num: u32,
    pub grid_snap: bool,
    pub keyboard: bool,
    pub block: bool,
    pub decorate_both: bool,
    pub disable: bool,
    pub extra_classes: String,
    pub force_edges: bool,
    pub from_fixed: bool,
    pub from_shadow: bool,
    pub hide_from_to: bool,
    pub hide_min_max: bool,
    pub to_fixed: bool,
    pub to_shadow: bool,
    pub drag_interval: bool,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN,
            max: DEFAULT_MAX,
            step: DEFAULT_STEP,
            from: None,
            to: None,
            from_min: None,
            from_max: None,
            to_min: None,
            to_max: None,
            min_interval: None,
            max_interval: None,
            slider_type: SliderType::Single,
            skin: SkinType::Flat,
            values: Vec::new(),
            pretty_values: Vec::new(),
            prettify_enabled: true,
            prettify_separator: PRETTIFY_SEPARATOR.to_string(),
            prettify: None,
            input_values_separator: INPUT_VALUES_SEPARATOR.to_string(),
            values_separator: VALUES_SEPARATOR.to_string(),
            grid: true,
            grid_margin: true,
            grid_num: DEFAULT_GRID_NUM,
            grid_snap: false,
            keyboard: true,
            block: false,
            decorate_both: true,
            disable: false,
            extra_classes: String::new(),
            force_edges: false,
            from_fixed: false,
            from_shadow: false,
            hide_from_to: false,
            hide_min_max: false,
            to_fixed: false,
            to_shadow: false,
            drag_interval: false,
        }
    }
}

/// Partial user configuration, typically deserialized from markup attributes
/// or JSON. Numeric fields accept either numbers or strings.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SliderOptions {
    pub min: Option<SliderValue>,
    pub max: Option<SliderValue>,
    pub step: Option<SliderValue>,
    pub from: Option<SliderValue>,
    pub to: Option<SliderValue>,
    pub from_min: Option<SliderValue>,
    pub from_max: Option<SliderValue>,
    pub to_min: Option<SliderValue>,
    pub to_max: Option<SliderValue>,
    pub min_interval: Option<SliderValue>,
    pub max_interval: Option<SliderValue>,
    pub grid_num: Option<SliderValue>,
    #[serde(rename = "type")]
    pub slider_type: Option<SliderType>,
    pub skin: Option<SkinType>,
    pub values: Option<Vec<SliderValue>>,
    pub prettify_enabled: Option<bool>,
    pub prettify_separator: Option<String>,
    #[serde(skip)]
    pub prettify: Option<PrettifyFn>,
    pub input_values_separator: Option<String>,
    pub values_separator: Option<String>,
    pub grid: Option<bool>,
    pub grid_margin: Option<bool>,
    pub grid_snap: Option<bool>,
    pub keyboard: Option<bool>,
    pub block: Option<bool>,
    pub decorate_both: Option<bool>,
    pub disable: Option<bool>,
    pub extra_classes: Option<String>,
    pub force_edges: Option<bool>,
    pub from_fixed: Option<bool>,
    pub from_shadow: Option<bool>,
    pub hide_from_to: Option<bool>,
    pub hide_min_max: Option<bool>,
    pub to_fixed: Option<bool>,
    pub to_shadow: Option<bool>,
    pub drag_interval: Option<bool>,
}

/// Build a resolved configuration from user options, optionally seeding the
/// selection from a serialized `"<from><sep><to>"` string.
///
/// The input-values string is the only hard failure: anything that does not
/// split into two non-empty tokens is ambiguous intent and aborts setup. With
/// a discrete `values` list, each token resolves to its index in the list
/// (`None` when absent, left to the caller); otherwise the parsed number
/// lands in `from`/`to` directly, without re-validation.
pub fn initialize_configuration(
    options: &SliderOptions,
    input_values: Option<&str>,
) -> Result<SliderConfig, ConfigError> {
    let mut configuration = merge_configurations(&SliderConfig::default(), options, None);

    if let Some(raw) = input_values {
        if !raw.is_empty() {
            let separator = configuration.input_values_separator.clone();
            let mut tokens = raw.splitn(3, separator.as_str());
            let first = tokens.next().unwrap_or("");
            let second = tokens.next().unwrap_or("");
            if first.is_empty() || second.is_empty() {
                return Err(ConfigError::InputValues { separator });
            }

            let first = SliderValue::parse(first);
            let second = SliderValue::parse(second);

            if configuration.values.is_empty() {
                configuration.from = first.as_number();
                configuration.to = second.as_number();
            } else {
                configuration.from = value_index(&configuration.values, &first);
                configuration.to = value_index(&configuration.values, &second);
            }
            debug!(
                "input values resolved to from={:?}, to={:?}",
                configuration.from, configuration.to
            );
        }
    }

    Ok(configuration)
}

/// Overlay `overrides` on `base` field by field, coerce string-typed numeric
/// fields, and run the full validation pipeline.
pub fn merge_configurations(
    base: &SliderConfig,
    overrides: &SliderOptions,
    update_check: Option<&UpdateCheck>,
) -> SliderConfig {
    let merged = overlay(base.clone(), overrides);
    check_configuration(merged, update_check)
}

// Shallow merge: an override wins per field, no deep merge. Coercion failures
// on always-set fields keep the base value; on optional fields they yield
// "unset" and fall through to the clamping rules.
fn overlay(mut configuration: SliderConfig, overrides: &SliderOptions) -> SliderConfig {
    if let Some(number) = overrides.min.as_ref().and_then(SliderValue::as_number) {
        configuration.min = number;
    }
    if let Some(number) = overrides.max.as_ref().and_then(SliderValue::as_number) {
        configuration.max = number;
    }
    if let Some(number) = overrides.step.as_ref().and_then(SliderValue::as_number) {
        configuration.step = number;
    }
    if let Some(number) = overrides.grid_num.as_ref().and_then(SliderValue::as_number) {
        configuration.grid_num = number.max(0.0) as u32;
    }

    if let Some(value) = &overrides.from {
        configuration.from = value.as_number();
    }
    if let Some(value) = &overrides.to {
        configuration.to = value.as_number();
    }
    if let Some(value) = &overrides.from_min {
        configuration.from_min = value.as_number();
    }
    if let Some(value) = &overrides.from_max {
        configuration.from_max = value.as_number();
    }
    if let Some(value) = &overrides.to_min {
        configuration.to_min = value.as_number();
    }
    if let Some(value) = &overrides.to_max {
        configuration.to_max = value.as_number();
    }
    if let Some(value) = &overrides.min_interval {
        configuration.min_interval = value.as_number();
    }
    if let Some(value) = &overrides.max_interval {
        configuration.max_interval = value.as_number();
    }

    if let Some(slider_type) = overrides.slider_type {
        configuration.slider_type = slider_type;
    }
    if let Some(skin) = overrides.skin {
        configuration.skin = skin;
    }
    if let Some(values) = &overrides.values {
        configuration.values = values.clone();
    }
    if let Some(prettify) = &overrides.prettify {
        configuration.prettify = Some(prettify.clone());
    }

    if let Some(enabled) = overrides.prettify_enabled {
        configuration.prettify_enabled = enabled;
    }
    if let Some(separator) = &overrides.prettify_separator {
        configuration.prettify_separator = separator.clone();
    }
    if let Some(separator) = &overrides.input_values_separator {
        configuration.input_values_separator = separator.clone();
    }
    if let Some(separator) = &overrides.values_separator {
        configuration.values_separator = separator.clone();
    }
    if let Some(classes) = &overrides.extra_classes {
        configuration.extra_classes = classes.clone();
    }

    if let Some(flag) = overrides.grid {
        configuration.grid = flag;
    }
    if let Some(flag) = overrides.grid_margin {
        configuration.grid_margin = flag;
    }
    if let Some(flag) = overrides.grid_snap {
        configuration.grid_snap = flag;
    }
    if let Some(flag) = overrides.keyboard {
        configuration.keyboard = flag;
    }
    if let Some(flag) = overrides.block {
        configuration.block = flag;
    }
    if let Some(flag) = overrides.decorate_both {
        configuration.decorate_both = flag;
    }
    if let Some(flag) = overrides.disable {
        configuration.disable = flag;
    }
    if let Some(flag) = overrides.force_edges {
        configuration.force_edges = flag;
    }
    if let Some(flag) = overrides.from_fixed {
        configuration.from_fixed = flag;
    }
    if let Some(flag) = overrides.from_shadow {
        configuration.from_shadow = flag;
    }
    if let Some(flag) = overrides.hide_from_to {
        configuration.hide_from_to = flag;
    }
    if let Some(flag) = overrides.hide_min_max {
        configuration.hide_min_max = flag;
    }
    if let Some(flag) = overrides.to_fixed {
        configuration.to_fixed = flag;
    }
    if let Some(flag) = overrides.to_shadow {
        configuration.to_shadow = flag;
    }
    if let Some(flag) = overrides.drag_interval {
        configuration.drag_interval = flag;
    }

    configuration
}

/// Validate and clamp a configuration into a consistent state.
///
/// The clamp order is load-bearing: later steps may reintroduce marginal
/// violations of earlier ones (for example the `to_max` cross-field rule),
/// and downstream behavior depends on it. Guaranteed on return: `min <= max`,
/// `step > 0`, `from` and `to` are `Some` and inside `[min, max]`, intervals
/// are `Some` with `0 <= interval <= max - min`.
pub fn check_configuration(
    mut configuration: SliderConfig,
    update_check: Option<&UpdateCheck>,
) -> SliderConfig {
    if configuration.max < configuration.min {
        configuration.max = configuration.min;
    }

    update_pretty_values(&mut configuration);

    let mut from = configuration.from.unwrap_or(configuration.min);
    let mut to = configuration.to.unwrap_or(configuration.max);

    if from < configuration.min {
        from = configuration.min;
    }
    if from > configuration.max {
        from = configuration.max;
    }

    if configuration.slider_type == SliderType::Double {
        if to < configuration.min {
            to = configuration.min;
        }
        if to > configuration.max {
            to = configuration.max;
        }

        // Only the handle the caller actually moved may push the other one;
        // an unmoved handle yields instead of silently dragging its peer.
        if let Some(previous) = update_check {
            if previous.from != from && from > to {
                from = to;
            }
            if previous.to != to && to < from {
                to = from;
            }
        }

        if from > to {
            from = to;
        }
        if to < from {
            to = from;
        }
    }

    if configuration.step.is_nan() || configuration.step <= 0.0 {
        debug!(
            "invalid step {}, falling back to {}",
            configuration.step, DEFAULT_STEP
        );
        configuration.step = DEFAULT_STEP;
    }

    if let Some(bound) = configuration.from_min {
        if bound.is_finite() && from < bound {
            from = bound;
        }
    }
    if let Some(bound) = configuration.from_max {
        if bound.is_finite() && from > bound {
            from = bound;
        }
    }
    if let Some(bound) = configuration.to_min {
        if bound.is_finite() && to < bound {
            to = bound;
        }
    }
    // `to` is pulled down to its ceiling when *from* spills over it, not
    // when `to` itself does. Looks like a defect, but the rendering layer
    // depends on the observable behavior; see DESIGN.md.
    if let Some(bound) = configuration.to_max {
        if bound.is_finite() && from > bound {
            to = bound;
        }
    }

    configuration.from = Some(from);
    configuration.to = Some(to);

    let span = configuration.max - configuration.min;
    configuration.min_interval = Some(clamp_interval(configuration.min_interval, span));
    configuration.max_interval = Some(clamp_interval(configuration.max_interval, span));

    configuration
}

// Unset, zero or negative intervals collapse to 0; positive ones cap at the
// full range span.
fn clamp_interval(interval: Option<f64>, span: f64) -> f64 {
    match interval {
        Some(value) if value > 0.0 => {
            if value > span {
                span
            } else {
                value
            }
        }
        _ => 0.0,
    }
}

/// Derive the discrete-value metadata. No-op while `values` is empty.
///
/// A non-empty value table switches the slider to index addressing: bounds
/// become `0..values.len()-1`, stepping is forced to whole indices, and every
/// entry gets a display string in `pretty_values`. Entries with a numeric
/// prefix are normalized to numbers and prettified; plain labels pass through
/// verbatim.
pub fn update_pretty_values(configuration: &mut SliderConfig) {
    if configuration.values.is_empty() {
        return;
    }

    configuration.pretty_values.clear();
    configuration.min = 0.0;
    configuration.max = (configuration.values.len() - 1) as f64;
    configuration.step = 1.0;
    configuration.grid_num = configuration.values.len() as u32 - 1;
    configuration.grid_snap = true;

    for index in 0..configuration.values.len() {
        match configuration.values[index].as_number() {
            Some(number) => {
                configuration.values[index] = SliderValue::Num(number);
                let pretty = prettify(configuration, number);
                configuration.pretty_values.push(pretty);
            }
            None => {
                let label = match &configuration.values[index] {
                    SliderValue::Label(text) => text.clone(),
                    SliderValue::Num(number) => number.to_string(),
                };
                configuration.pretty_values.push(label);
            }
        }
    }
    debug!(
        "derived {} discrete values, range 0..{}",
        configuration.values.len(),
        configuration.max
    );
}

/// Format a value for display: plain decimal when prettifying is disabled,
/// the custom formatter when one is injected, thousands grouping otherwise.
pub fn prettify(configuration: &SliderConfig, value: f64) -> String {
    if !configuration.prettify_enabled {
        return value.to_string();
    }
    if let Some(custom) = &configuration.prettify {
        return custom.call(value);
    }
    default_prettify(&configuration.prettify_separator, value)
}

// Thousands grouping on the integer part only; sign and fraction pass
// through untouched.
fn default_prettify(separator: &str, value: f64) -> String {
    let text = value.to_string();
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(text.len() + integer.len() / 3 * separator.len());
    grouped.push_str(sign);
    for (position, digit) in integer.chars().enumerate() {
        if position > 0 && (integer.len() - position) % 3 == 0 {
            grouped.push_str(separator);
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

fn value_index(values: &[SliderValue], needle: &SliderValue) -> Option<f64> {
    let position = values.iter().position(|value| value == needle);
    if position.is_none() {
        warn!("input value {:?} not present in discrete values", needle);
    }
    position.map(|index| index as f64)
}
