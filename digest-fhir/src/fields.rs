//! Field extractors: turn single FHIR sub-structures into flat strings.
//!
//! Every extractor accepts an optional input and never fails. Text results default to the empty
//! string and list results to an empty `Vec`; the `format_*` helpers return `None` only when none
//! of their sub-parts is present.

use digest_core::IdentifierInfo;
use serde_json::Value;

/// Emitted when none of the recognised `value[x]` fields is present.
pub const NO_VALUE_FOUND: &str = "no value found";

/// Default rendering for a person without a usable name.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Trimmed string field of an object, or empty.
pub fn text(value: &Value, field: &str) -> String {
    opt_text(value, field).unwrap_or_default()
}

/// String field of an object when present and non-blank.
pub fn opt_text(value: &Value, field: &str) -> Option<String> {
    value
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// First non-empty candidate, or empty.
pub fn first_non_empty<I>(candidates: I) -> String
where
    I: IntoIterator<Item = String>,
{
    candidates
        .into_iter()
        .find(|candidate| !candidate.is_empty())
        .unwrap_or_default()
}

/// Text of a CodeableConcept: free text, else the first coding's display, else its code.
pub fn codeable_text(concept: Option<&Value>) -> String {
    let Some(concept) = concept else {
        return String::new();
    };

    if let Some(text) = opt_text(concept, "text") {
        return text;
    }

    coding_display(concept.get("coding"))
}

/// Display of the first Coding in a list, else its code.
pub fn coding_display(codings: Option<&Value>) -> String {
    let Some(first) = codings
        .and_then(Value::as_array)
        .and_then(|codings| codings.first())
    else {
        return String::new();
    };

    opt_text(first, "display")
        .or_else(|| opt_text(first, "code"))
        .unwrap_or_default()
}

/// For an array of concepts, the first non-empty concept text.
pub fn first_codeable_text(concepts: Option<&Value>) -> String {
    first_non_empty(codeable_texts(concepts))
}

/// Every non-empty concept text in an array, in order.
pub fn codeable_texts(concepts: Option<&Value>) -> Vec<String> {
    concepts
        .and_then(Value::as_array)
        .map(|concepts| {
            concepts
                .iter()
                .map(|concept| codeable_text(Some(concept)))
                .filter(|text| !text.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Preferred rendering of a HumanName list.
///
/// Picks the entry with `use: official`, else the first. Uses its `text` when present, otherwise
/// joins prefixes, given names and family with single spaces.
pub fn person_name(names: Option<&Value>) -> String {
    let Some(names) = names.and_then(Value::as_array).filter(|n| !n.is_empty()) else {
        return UNKNOWN_NAME.to_string();
    };

    let name = names
        .iter()
        .find(|name| name.get("use").and_then(Value::as_str) == Some("official"))
        .unwrap_or(&names[0]);

    if let Some(text) = opt_text(name, "text") {
        return text;
    }

    let mut parts = string_list(name.get("prefix"));
    parts.extend(string_list(name.get("given")));
    parts.push(text(name, "family"));

    let joined = parts.join(" ");
    let normalized = joined.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        UNKNOWN_NAME.to_string()
    } else {
        normalized
    }
}

/// Array of strings, skipping anything that is not a string.
pub fn string_list(values: Option<&Value>) -> Vec<String> {
    values
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Display of a Reference, else its literal reference.
pub fn reference_display(reference: Option<&Value>) -> Option<String> {
    let reference = reference?;
    opt_text(reference, "display").or_else(|| opt_text(reference, "reference"))
}

pub fn reference_list(references: Option<&Value>) -> Vec<String> {
    references
        .and_then(Value::as_array)
        .map(|refs| {
            refs.iter()
                .filter_map(|reference| reference_display(Some(reference)))
                .collect()
        })
        .unwrap_or_default()
}

/// Scalar JSON rendered as text. Whole-number decimals drop their fraction (`98.0` is `"98"`).
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number_text(number)),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn number_text(number: &serde_json::Number) -> String {
    match number.as_f64() {
        Some(float) if number.is_f64() && float.fract() == 0.0 && float.abs() < 1e15 => {
            (float as i64).to_string()
        }
        _ => number.to_string(),
    }
}

/// `"{value} {unit}"`, with the comparator prefixed when present.
pub fn format_quantity(quantity: Option<&Value>) -> Option<String> {
    let (value, unit) = quantity_parts(quantity?);
    match (value.is_empty(), unit.is_empty()) {
        (true, true) => None,
        (false, true) => Some(value),
        (true, false) => Some(unit),
        (false, false) => Some(format!("{value} {unit}")),
    }
}

/// Magnitude and unit of a Quantity. The unit falls back to the UCUM code.
fn quantity_parts(quantity: &Value) -> (String, String) {
    let magnitude = quantity
        .get("value")
        .and_then(scalar_text)
        .unwrap_or_default();
    let value = match (opt_text(quantity, "comparator"), magnitude.is_empty()) {
        (Some(comparator), false) => format!("{comparator}{magnitude}"),
        _ => magnitude,
    };
    let unit = opt_text(quantity, "unit")
        .or_else(|| opt_text(quantity, "code"))
        .unwrap_or_default();
    (value, unit)
}

/// `"From: {start} - Until: {end}"`, or just the half that is present.
pub fn format_period(period: Option<&Value>) -> Option<String> {
    let period = period?;
    match (opt_text(period, "start"), opt_text(period, "end")) {
        (Some(start), Some(end)) => Some(format!("From: {start} - Until: {end}")),
        (Some(start), None) => Some(format!("From: {start}")),
        (None, Some(end)) => Some(format!("Until: {end}")),
        (None, None) => None,
    }
}

/// `"{low} - {high}"`, or an open bound.
pub fn format_range(range: Option<&Value>) -> Option<String> {
    let range = range?;
    match (
        format_quantity(range.get("low")),
        format_quantity(range.get("high")),
    ) {
        (Some(low), Some(high)) => Some(format!("{low} - {high}")),
        (Some(low), None) => Some(format!(">= {low}")),
        (None, Some(high)) => Some(format!("<= {high}")),
        (None, None) => None,
    }
}

/// `"{numerator} / {denominator}"`.
pub fn format_ratio(ratio: Option<&Value>) -> Option<String> {
    let ratio = ratio?;
    match (
        format_quantity(ratio.get("numerator")),
        format_quantity(ratio.get("denominator")),
    ) {
        (Some(numerator), Some(denominator)) => Some(format!("{numerator} / {denominator}")),
        (Some(numerator), None) => Some(numerator),
        (None, Some(denominator)) => Some(format!("/ {denominator}")),
        (None, None) => None,
    }
}

/// `"{value} {currency}"`.
pub fn format_money(money: Option<&Value>) -> Option<String> {
    let money = money?;
    let value = money.get("value").and_then(scalar_text);
    match (value, opt_text(money, "currency")) {
        (Some(value), Some(currency)) => Some(format!("{value} {currency}")),
        (Some(value), None) => Some(value),
        (None, Some(currency)) => Some(currency),
        (None, None) => None,
    }
}

/// Timing code text, else `"{frequency} per {period} {periodUnit}"`, else the first event.
pub fn format_timing(timing: Option<&Value>) -> Option<String> {
    let timing = timing?;

    let code = codeable_text(timing.get("code"));
    if !code.is_empty() {
        return Some(code);
    }

    if let Some(repeat) = timing.get("repeat") {
        let frequency = repeat.get("frequency").and_then(scalar_text);
        let period = repeat.get("period").and_then(scalar_text);
        let unit = opt_text(repeat, "periodUnit");
        if frequency.is_some() || period.is_some() || unit.is_some() {
            let rendered = format!(
                "{} per {} {}",
                frequency.unwrap_or_default(),
                period.unwrap_or_default(),
                unit.unwrap_or_default()
            );
            return Some(rendered.split_whitespace().collect::<Vec<_>>().join(" "));
        }
    }

    timing
        .get("event")
        .and_then(Value::as_array)
        .and_then(|events| events.first())
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// ContactPoints as `"{system}: {value}"`.
pub fn telecom_lines(telecom: Option<&Value>) -> Vec<String> {
    telecom
        .and_then(Value::as_array)
        .map(|points| {
            points
                .iter()
                .filter_map(|point| {
                    let value = opt_text(point, "value")?;
                    Some(match opt_text(point, "system") {
                        Some(system) => format!("{system}: {value}"),
                        None => value,
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Addresses as single lines: their `text`, else the parts joined by commas.
pub fn address_lines(addresses: Option<&Value>) -> Vec<String> {
    addresses
        .and_then(Value::as_array)
        .map(|addresses| addresses.iter().filter_map(address_line).collect())
        .unwrap_or_default()
}

fn address_line(address: &Value) -> Option<String> {
    if let Some(text) = opt_text(address, "text") {
        return Some(text);
    }

    let mut parts = string_list(address.get("line"));
    parts.extend(
        ["city", "district", "state", "postalCode", "country"]
            .iter()
            .filter_map(|field| opt_text(address, field)),
    );
    let parts: Vec<_> = parts.into_iter().filter(|p| !p.trim().is_empty()).collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

pub fn identifiers(identifiers: Option<&Value>) -> Vec<IdentifierInfo> {
    identifiers
        .and_then(Value::as_array)
        .map(|identifiers| {
            identifiers
                .iter()
                .filter_map(|identifier| {
                    Some(IdentifierInfo {
                        kind: codeable_text(identifier.get("type")),
                        value: opt_text(identifier, "value")?,
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// First identifier value.
pub fn first_identifier(identifiers: Option<&Value>) -> Option<String> {
    identifiers
        .and_then(Value::as_array)?
        .iter()
        .find_map(|identifier| opt_text(identifier, "value"))
}

/// Annotation texts.
pub fn notes(notes: Option<&Value>) -> Vec<String> {
    notes
        .and_then(Value::as_array)
        .map(|notes| notes.iter().filter_map(|n| opt_text(n, "text")).collect())
        .unwrap_or_default()
}

/// Reference ranges as their `text`, else the low/high bounds.
pub fn reference_ranges(ranges: Option<&Value>) -> Vec<String> {
    ranges
        .and_then(Value::as_array)
        .map(|ranges| {
            ranges
                .iter()
                .filter_map(|range| opt_text(range, "text").or_else(|| format_range(Some(range))))
                .collect()
        })
        .unwrap_or_default()
}

/// One typed variant of a polymorphic `[x]` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceSlot {
    Quantity,
    Age,
    CodeableConcept,
    Reference,
    String,
    Boolean,
    Integer,
    PositiveInt,
    DateTime,
    Date,
    Instant,
    Period,
    Range,
    Ratio,
    Timing,
}

impl ChoiceSlot {
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Quantity => "Quantity",
            Self::Age => "Age",
            Self::CodeableConcept => "CodeableConcept",
            Self::Reference => "Reference",
            Self::String => "String",
            Self::Boolean => "Boolean",
            Self::Integer => "Integer",
            Self::PositiveInt => "PositiveInt",
            Self::DateTime => "DateTime",
            Self::Date => "Date",
            Self::Instant => "Instant",
            Self::Period => "Period",
            Self::Range => "Range",
            Self::Ratio => "Ratio",
            Self::Timing => "Timing",
        }
    }

    fn render(&self, value: &Value) -> ChoiceValue {
        match self {
            Self::Quantity | Self::Age => {
                let (value, unit) = quantity_parts(value);
                ChoiceValue { value, unit }
            }
            Self::CodeableConcept => ChoiceValue::text(codeable_text(Some(value))),
            Self::Reference => {
                ChoiceValue::text(reference_display(Some(value)).unwrap_or_default())
            }
            Self::String
            | Self::Boolean
            | Self::Integer
            | Self::PositiveInt
            | Self::DateTime
            | Self::Date
            | Self::Instant => ChoiceValue::text(scalar_text(value).unwrap_or_default()),
            Self::Period => ChoiceValue::text(format_period(Some(value)).unwrap_or_default()),
            Self::Range => ChoiceValue::text(format_range(Some(value)).unwrap_or_default()),
            Self::Ratio => ChoiceValue::text(format_ratio(Some(value)).unwrap_or_default()),
            Self::Timing => ChoiceValue::text(format_timing(Some(value)).unwrap_or_default()),
        }
    }

    fn timestamp(&self, value: &Value) -> Option<String> {
        match self {
            Self::Period => opt_text(value, "start").or_else(|| opt_text(value, "end")),
            Self::Timing => value
                .get("event")
                .and_then(Value::as_array)
                .and_then(|events| events.first())
                .and_then(Value::as_str)
                .map(str::to_string)
                .or_else(|| {
                    value
                        .get("repeat")
                        .and_then(|repeat| repeat.get("boundsPeriod"))
                        .and_then(|bounds| opt_text(bounds, "start"))
                }),
            _ => Some(self.render(value).value).filter(|text| !text.is_empty()),
        }
    }
}

/// A resolved choice value. `unit` is only filled for quantities.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChoiceValue {
    pub value: String,
    pub unit: String,
}

impl ChoiceValue {
    fn text(value: String) -> Self {
        Self {
            value,
            unit: String::new(),
        }
    }
}

/// A `[x]` field family: a base name and its slots in preference order.
#[derive(Debug, Clone, Copy)]
pub struct ChoiceFamily {
    pub name: &'static str,
    pub slots: &'static [ChoiceSlot],
}

pub const VALUE: ChoiceFamily = ChoiceFamily {
    name: "value",
    slots: &[
        ChoiceSlot::Quantity,
        ChoiceSlot::CodeableConcept,
        ChoiceSlot::String,
        ChoiceSlot::Boolean,
        ChoiceSlot::Integer,
        ChoiceSlot::DateTime,
        ChoiceSlot::Period,
        ChoiceSlot::Range,
        ChoiceSlot::Ratio,
    ],
};

pub const ONSET: ChoiceFamily = ChoiceFamily {
    name: "onset",
    slots: &[
        ChoiceSlot::DateTime,
        ChoiceSlot::Age,
        ChoiceSlot::Period,
        ChoiceSlot::Range,
        ChoiceSlot::String,
    ],
};

pub const OCCURRENCE: ChoiceFamily = ChoiceFamily {
    name: "occurrence",
    slots: &[
        ChoiceSlot::DateTime,
        ChoiceSlot::String,
        ChoiceSlot::Period,
        ChoiceSlot::Timing,
    ],
};

pub const EFFECTIVE: ChoiceFamily = ChoiceFamily {
    name: "effective",
    slots: &[
        ChoiceSlot::DateTime,
        ChoiceSlot::Instant,
        ChoiceSlot::Period,
        ChoiceSlot::Timing,
    ],
};

pub const PERFORMED: ChoiceFamily = ChoiceFamily {
    name: "performed",
    slots: &[
        ChoiceSlot::DateTime,
        ChoiceSlot::Period,
        ChoiceSlot::String,
        ChoiceSlot::Age,
        ChoiceSlot::Range,
    ],
};

pub const SCHEDULED: ChoiceFamily = ChoiceFamily {
    name: "scheduled",
    slots: &[ChoiceSlot::Timing, ChoiceSlot::Period, ChoiceSlot::String],
};

pub const COLLECTED: ChoiceFamily = ChoiceFamily {
    name: "collected",
    slots: &[ChoiceSlot::DateTime, ChoiceSlot::Period],
};

pub const START: ChoiceFamily = ChoiceFamily {
    name: "start",
    slots: &[ChoiceSlot::Date, ChoiceSlot::CodeableConcept],
};

pub const DUE: ChoiceFamily = ChoiceFamily {
    name: "due",
    slots: &[ChoiceSlot::Date],
};

pub const DOSE_NUMBER: ChoiceFamily = ChoiceFamily {
    name: "doseNumber",
    slots: &[ChoiceSlot::PositiveInt, ChoiceSlot::String],
};

pub const PRODUCT: ChoiceFamily = ChoiceFamily {
    name: "product",
    slots: &[ChoiceSlot::CodeableConcept, ChoiceSlot::Reference],
};

pub const MEDICATION: ChoiceFamily = ChoiceFamily {
    name: "medication",
    slots: &[ChoiceSlot::CodeableConcept, ChoiceSlot::Reference],
};

impl ChoiceFamily {
    /// First slot whose field is present and non-null, in preference order.
    pub fn find<'a>(&self, holder: &'a Value) -> Option<(ChoiceSlot, &'a Value)> {
        self.slots.iter().find_map(|slot| {
            let field = format!("{}{}", self.name, slot.suffix());
            holder
                .get(&field)
                .filter(|value| !value.is_null())
                .map(|value| (*slot, value))
        })
    }

    /// Rendered value of the first populated slot.
    pub fn resolve(&self, holder: &Value) -> Option<ChoiceValue> {
        self.find(holder).map(|(slot, value)| slot.render(value))
    }

    /// Rendered text of the first populated slot, when non-empty.
    pub fn resolve_text(&self, holder: &Value) -> Option<String> {
        self.resolve(holder)
            .map(|choice| choice.value)
            .filter(|text| !text.is_empty())
    }

    /// Point in time of the first populated slot. Periods yield their start.
    pub fn timestamp(&self, holder: &Value) -> Option<String> {
        self.find(holder)
            .and_then(|(slot, value)| slot.timestamp(value))
    }
}

/// Resolve `value[x]`, falling back to the [`NO_VALUE_FOUND`] sentinel.
pub fn resolve_value(holder: &Value) -> ChoiceValue {
    VALUE.resolve(holder).unwrap_or_else(|| ChoiceValue {
        value: NO_VALUE_FOUND.to_string(),
        unit: String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn codeable_text_prefers_text_then_display_then_code() {
        let concept = json!({"text": "Fever", "coding": [{"display": "Pyrexia", "code": "386661006"}]});
        assert_eq!(codeable_text(Some(&concept)), "Fever");

        let concept = json!({"coding": [{"display": "Pyrexia", "code": "386661006"}]});
        assert_eq!(codeable_text(Some(&concept)), "Pyrexia");

        let concept = json!({"coding": [{"code": "386661006"}]});
        assert_eq!(codeable_text(Some(&concept)), "386661006");

        assert_eq!(codeable_text(None), "");
        assert_eq!(codeable_text(Some(&json!({}))), "");
    }

    #[test]
    fn concept_array_returns_first_non_empty() {
        let concepts = json!([{}, {"coding": [{"code": "vital-signs"}]}, {"text": "Later"}]);
        assert_eq!(first_codeable_text(Some(&concepts)), "vital-signs");
        assert_eq!(
            codeable_texts(Some(&concepts)),
            vec!["vital-signs".to_string(), "Later".to_string()]
        );
    }

    #[test]
    fn person_name_prefers_official_entry() {
        let names = json!([
            {"use": "nickname", "text": "Bobby"},
            {"use": "official", "prefix": ["Dr."], "given": ["Robert", " James"], "family": "Smith"}
        ]);
        assert_eq!(person_name(Some(&names)), "Dr. Robert James Smith");
    }

    #[test]
    fn person_name_defaults_to_unknown() {
        assert_eq!(person_name(None), UNKNOWN_NAME);
        assert_eq!(person_name(Some(&json!([]))), UNKNOWN_NAME);
        assert_eq!(person_name(Some(&json!([{"given": []}]))), UNKNOWN_NAME);
        assert_eq!(person_name(Some(&json!([{"text": "Asha Rao"}]))), "Asha Rao");
    }

    #[test]
    fn value_resolution_follows_preference_order() {
        let observation = json!({
            "valueString": "ignored",
            "valueQuantity": {"value": 98.6, "unit": "F"}
        });
        assert_eq!(
            resolve_value(&observation),
            ChoiceValue {
                value: "98.6".to_string(),
                unit: "F".to_string()
            }
        );

        let observation = json!({"valueQuantity": null, "valueBoolean": false});
        assert_eq!(resolve_value(&observation).value, "false");
    }

    #[test]
    fn value_resolution_emits_sentinel_only_when_absent() {
        assert_eq!(resolve_value(&json!({})).value, NO_VALUE_FOUND);
        assert_eq!(resolve_value(&json!({"valueString": ""})).value, "");
        assert_eq!(resolve_value(&json!({"valueInteger": 7})).value, "7");
    }

    #[test]
    fn value_resolution_covers_structured_slots() {
        let ratio = json!({"valueRatio": {
            "numerator": {"value": 1, "unit": "tablet"},
            "denominator": {"value": 2, "unit": "day"}
        }});
        assert_eq!(resolve_value(&ratio).value, "1 tablet / 2 day");

        let range = json!({"valueRange": {"low": {"value": 3.5, "unit": "g/dL"}}});
        assert_eq!(resolve_value(&range).value, ">= 3.5 g/dL");

        let period = json!({"valuePeriod": {"start": "2024-01-01", "end": "2024-01-05"}});
        assert_eq!(
            resolve_value(&period).value,
            "From: 2024-01-01 - Until: 2024-01-05"
        );
    }

    #[test]
    fn whole_decimals_render_without_fraction() {
        assert_eq!(scalar_text(&json!(98.0)).as_deref(), Some("98"));
        assert_eq!(scalar_text(&json!(98.6)).as_deref(), Some("98.6"));
        assert_eq!(scalar_text(&json!(-2.0)).as_deref(), Some("-2"));
        assert_eq!(scalar_text(&json!(120)).as_deref(), Some("120"));
    }

    #[test]
    fn plain_and_optional_text_agree_on_whitespace() {
        let holder = json!({"status": "  final ", "blank": "   "});
        assert_eq!(text(&holder, "status"), "final");
        assert_eq!(opt_text(&holder, "status").as_deref(), Some("final"));
        assert_eq!(text(&holder, "blank"), "");
        assert_eq!(opt_text(&holder, "blank"), None);
    }

    #[test]
    fn quantity_unit_falls_back_to_code() {
        let quantity = json!({"value": 5, "code": "mg", "comparator": "<"});
        assert_eq!(format_quantity(Some(&quantity)).as_deref(), Some("<5 mg"));
        assert_eq!(format_quantity(Some(&json!({}))), None);
    }

    #[test]
    fn period_formats_partial_bounds() {
        assert_eq!(
            format_period(Some(&json!({"start": "2024-03-01"}))).as_deref(),
            Some("From: 2024-03-01")
        );
        assert_eq!(
            format_period(Some(&json!({"end": "2024-03-09"}))).as_deref(),
            Some("Until: 2024-03-09")
        );
        assert_eq!(format_period(Some(&json!({}))), None);
    }

    #[test]
    fn money_and_timing_templates() {
        assert_eq!(
            format_money(Some(&json!({"value": 1250.5, "currency": "INR"}))).as_deref(),
            Some("1250.5 INR")
        );

        let timing = json!({"repeat": {"frequency": 2, "period": 1, "periodUnit": "d"}});
        assert_eq!(format_timing(Some(&timing)).as_deref(), Some("2 per 1 d"));

        let timing = json!({"code": {"text": "BID"}, "repeat": {"frequency": 2}});
        assert_eq!(format_timing(Some(&timing)).as_deref(), Some("BID"));
    }

    #[test]
    fn timestamps_use_period_start() {
        let observation = json!({"effectivePeriod": {"start": "2024-02-01T10:00:00Z"}});
        assert_eq!(
            EFFECTIVE.timestamp(&observation).as_deref(),
            Some("2024-02-01T10:00:00Z")
        );
        assert_eq!(EFFECTIVE.timestamp(&json!({})), None);
    }

    #[test]
    fn contact_details_flatten() {
        let telecom = json!([{"system": "phone", "value": "+91-99999"}, {"system": "email"}]);
        assert_eq!(telecom_lines(Some(&telecom)), vec!["phone: +91-99999"]);

        let addresses = json!([{"line": ["12 MG Road"], "city": "Pune", "country": "IN"}]);
        assert_eq!(address_lines(Some(&addresses)), vec!["12 MG Road, Pune, IN"]);
    }
}
