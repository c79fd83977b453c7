use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit JSON `null` like a missing key.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(rename = "id_empleado")]
    pub id: i64,
    #[serde(rename = "nombre", default, deserialize_with = "null_default")]
    pub first_name: String,
    #[serde(rename = "apellido_p", alias = "apellido", default, deserialize_with = "null_default")]
    pub paternal_surname: String,
    #[serde(rename = "apellido_m", default, deserialize_with = "null_default")]
    pub maternal_surname: String,
    #[serde(default, deserialize_with = "null_default")]
    pub area: String,
    #[serde(rename = "turno", default, deserialize_with = "null_default")]
    pub shift: String,
    /// Accepts a JSON number or a numeric string.
    #[serde(rename = "salarioDiario", default, deserialize_with = "null_default")]
    pub daily_wage: Decimal,
    #[serde(rename = "activo", default, deserialize_with = "null_default")]
    pub active: bool,
}

impl Employee {
    pub fn full_name(&self) -> String {
        [
            self.first_name.as_str(),
            self.paternal_surname.as_str(),
            self.maternal_surname.as_str(),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
    }

    pub fn status_label(&self) -> &'static str {
        if self.active {
            "ACTIVE"
        } else {
            "INACTIVE"
        }
    }
}

/// One page of the employee listing.
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeePage {
    #[serde(default, deserialize_with = "null_default")]
    pub data: Vec<Employee>,
    #[serde(default, deserialize_with = "null_default")]
    pub next: Option<String>,
}

impl EmployeePage {
    /// An empty `next` counts as absent.
    pub fn next_locator(&self) -> Option<&str> {
        self.next.as_deref().filter(|n| !n.trim().is_empty())
    }
}

/// A numeric field the API sends either as a JSON number or as a string
/// (aggregate columns often arrive stringified).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(f64),
    Text(String),
}

impl Quantity {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Quantity::Number(n) => Some(*n),
            Quantity::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::Number(0.0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            Quantity::Number(n) => write!(f, "{n}"),
            Quantity::Text(s) => f.write_str(s),
        }
    }
}
