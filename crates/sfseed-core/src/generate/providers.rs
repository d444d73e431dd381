use base64::Engine as _;
use chrono::{Duration as ChronoDuration, NaiveDateTime, NaiveTime};
use fake::faker::address::en::*;
use fake::faker::internet::en::*;
use fake::faker::lorem::en::*;
use fake::faker::phone_number::en::*;
use fake::Fake;
use rand::Rng;

use crate::error::{Result, SfSeedError};
use crate::generate::field_type::FieldType;
use crate::generate::plan::FieldConfig;
use crate::generate::value::Value;

/// Delimiter joining the selections of a `multipicklist` value.
pub const MULTIPICKLIST_DELIMITER: &str = ";";

/// Length of a generated `id` value (Salesforce case-insensitive id form).
const ID_LENGTH: usize = 18;

/// Something that can produce one random value given a field config.
///
/// `base_time` is the engine's pinned wall-clock anchor; all temporal values
/// are offsets from it so that a seeded run is reproducible.
pub trait ValueGenerator {
    fn generate<R: Rng>(
        &self,
        config: &mut FieldConfig,
        rng: &mut R,
        base_time: NaiveDateTime,
    ) -> Result<Value>;
}

impl ValueGenerator for FieldType {
    fn generate<R: Rng>(
        &self,
        config: &mut FieldConfig,
        rng: &mut R,
        base_time: NaiveDateTime,
    ) -> Result<Value> {
        let value = match self {
            // === Enumerations ===
            FieldType::Picklist => match config.picklist_values.as_deref() {
                None => Value::Null,
                Some([]) => return Err(empty_pool(*self)),
                Some(pool) => Value::String(pool[rng.random_range(0..pool.len())].clone()),
            },
            FieldType::MultiPicklist => match config.picklist_values.as_deref() {
                None => Value::Null,
                Some([]) => return Err(empty_pool(*self)),
                Some(pool) => {
                    let amount = rng.random_range(1..=pool.len());
                    let picked: Vec<&str> = rand::seq::index::sample(rng, pool.len(), amount)
                        .iter()
                        .map(|i| pool[i].as_str())
                        .collect();
                    Value::String(picked.join(MULTIPICKLIST_DELIMITER))
                }
            },
            FieldType::Combobox => {
                // Comboboxes accept free text, so the pool grows with each draw.
                let pool = config.picklist_values.get_or_insert_with(Vec::new);
                pool.push(Word().fake_with_rng(rng));
                Value::String(pool[rng.random_range(0..pool.len())].clone())
            }

            // === Scalars ===
            FieldType::Boolean => Value::Bool(rng.random_bool(0.5)),
            FieldType::Int => Value::Int(rng.random_range(0..10_000)),
            FieldType::Double => {
                let val: f64 = rng.random_range(-10_000.0_f64..10_000.0_f64);
                Value::Float(round_to(val, 4))
            }
            FieldType::Currency => {
                let val: f64 = rng.random_range(0.0_f64..1_000_000.0_f64);
                Value::Float(round_to(val, 2))
            }
            FieldType::Percent => {
                let val: f64 = rng.random_range(0.0_f64..=100.0_f64);
                Value::Float(round_to(val, 2))
            }

            // === Temporal ===
            FieldType::Date => {
                let days_offset = rng.random_range(-3650..365);
                Value::Date(base_time.date() + ChronoDuration::days(days_offset))
            }
            FieldType::DateTime => {
                let days_ago = rng.random_range(0..3650);
                let seconds = rng.random_range(0..86_400);
                Value::DateTime(
                    base_time - ChronoDuration::days(days_ago) + ChronoDuration::seconds(seconds),
                )
            }
            FieldType::Time => {
                let hour = rng.random_range(0..24);
                let min = rng.random_range(0..60);
                let sec = rng.random_range(0..60);
                Value::Time(NaiveTime::from_hms_opt(hour, min, sec).unwrap_or_default())
            }

            // === Contact ===
            FieldType::Email => Value::String(SafeEmail().fake_with_rng(rng)),
            FieldType::Phone => Value::String(PhoneNumber().fake_with_rng(rng)),
            FieldType::Url => {
                let word: String = Word().fake_with_rng(rng);
                let suffix: String = DomainSuffix().fake_with_rng(rng);
                Value::String(format!("https://www.{}.{}", word, suffix))
            }
            FieldType::Address => {
                let number: String = BuildingNumber().fake_with_rng(rng);
                let street: String = StreetName().fake_with_rng(rng);
                let city: String = CityName().fake_with_rng(rng);
                let state: String = StateAbbr().fake_with_rng(rng);
                let zip: String = ZipCode().fake_with_rng(rng);
                Value::String(format!("{} {}, {}, {} {}", number, street, city, state, zip))
            }
            FieldType::Location => {
                let lat: f64 = Latitude().fake_with_rng(rng);
                let lon: f64 = Longitude().fake_with_rng(rng);
                Value::String(format!("{:.6},{:.6}", lat, lon))
            }

            // === Text ===
            FieldType::String => {
                let words: Vec<String> = Words(1..4).fake_with_rng(rng);
                Value::String(words.join(" "))
            }
            FieldType::TextArea => Value::String(Paragraph(2..5).fake_with_rng(rng)),
            FieldType::AnyType => Value::String(random_alphanumeric(rng, 20)),
            FieldType::Id => Value::String(random_alphanumeric(rng, ID_LENGTH)),
            FieldType::Base64 => {
                let len = rng.random_range(112..=750);
                let bytes: Vec<u8> = (0..len).map(|_| rng.random::<u8>()).collect();
                Value::String(base64::engine::general_purpose::STANDARD.encode(bytes))
            }
        };

        Ok(value)
    }
}

/// Reject an explicitly empty pool before any value is drawn from it.
///
/// A missing pool is allowed (it yields nulls); an empty one is a caller bug.
/// Comboboxes are exempt because every draw adds a fresh candidate.
pub fn validate_config(field_type: FieldType, config: &FieldConfig) -> Result<()> {
    match field_type {
        FieldType::Picklist | FieldType::MultiPicklist => match config.picklist_values.as_deref() {
            Some([]) => Err(empty_pool(field_type)),
            _ => Ok(()),
        },
        _ => Ok(()),
    }
}

fn empty_pool(field_type: FieldType) -> SfSeedError {
    SfSeedError::invalid(format!(
        "{} generation requires a non-empty picklist_values pool",
        field_type
    ))
}

fn round_to(val: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (val * factor).round() / factor
}

fn random_alphanumeric(rng: &mut impl Rng, len: usize) -> String {
    const CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    (0..len)
        .map(|_| CHARS[rng.random_range(0..CHARS.len())] as char)
        .collect()
}
