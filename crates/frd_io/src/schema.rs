//! Embedded JSON Schemas (draft 7) and first-violation validation.
//!
//! These are shape checks only (types, required records). Key sets and
//! enum tokens are enforced by typed deserialization afterwards.

use serde_json::Value;

use crate::IoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Input,
    Constants,
}

impl SchemaKind {
    pub const fn source(self) -> &'static str {
        match self {
            SchemaKind::Input => INPUT_SCHEMA_JSON,
            SchemaKind::Constants => CONSTANTS_SCHEMA_JSON,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            SchemaKind::Input => "input",
            SchemaKind::Constants => "normativa",
        }
    }
}

pub const INPUT_SCHEMA_JSON: &str = r##"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "type": "object",
  "required": ["historicalData", "annualData"],
  "definitions": {
    "amount": { "type": ["number", "null"] },
    "lineItems": {
      "type": "object",
      "additionalProperties": { "$ref": "#/definitions/amount" }
    },
    "art23Employee": {
      "type": "object",
      "required": ["id"],
      "properties": {
        "id": { "type": "string" },
        "partTimePercentage": { "$ref": "#/definitions/amount" },
        "cedoliniEmessi": { "$ref": "#/definitions/amount" }
      }
    },
    "allocation": {
      "type": "object",
      "properties": {
        "stanziate": { "$ref": "#/definitions/amount" },
        "risparmi": { "$ref": "#/definitions/amount" },
        "aBilancio": { "$ref": "#/definitions/amount" },
        "isManuallyOverridden": { "type": "boolean" }
      }
    }
  },
  "properties": {
    "historicalData": { "type": "object" },
    "annualData": {
      "type": "object",
      "required": ["annoRiferimento"],
      "properties": {
        "annoRiferimento": { "type": "integer", "minimum": 2000, "maximum": 2100 },
        "denominazioneEnte": { "type": ["string", "null"] },
        "personaleServizioAttuale": {
          "type": "array",
          "items": {
            "type": "object",
            "required": ["category"],
            "properties": { "count": { "$ref": "#/definitions/amount" } }
          }
        },
        "personale2018PerArt23": { "type": "array", "items": { "$ref": "#/definitions/art23Employee" } },
        "personaleAnnoRifPerArt23": { "type": "array", "items": { "$ref": "#/definitions/art23Employee" } },
        "simulatoreRisultati": { "type": ["object", "null"] }
      }
    },
    "fondoAccessorioDipendenteData": { "$ref": "#/definitions/lineItems" },
    "fondoElevateQualificazioniData": { "$ref": "#/definitions/lineItems" },
    "fondoSegretarioComunaleData": { "$ref": "#/definitions/lineItems" },
    "fondoDirigenzaData": { "$ref": "#/definitions/lineItems" },
    "distribuzioneRisorseData": {
      "type": "object",
      "patternProperties": {
        "^p_": { "$ref": "#/definitions/allocation" },
        "^u_(incrIndennita|indennitaEx8QF)": { "$ref": "#/definitions/allocation" }
      }
    }
  }
}"##;

pub const CONSTANTS_SCHEMA_JSON: &str = r##"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "type": "object",
  "required": ["valori_pro_capite", "limiti", "riferimenti_normativi"],
  "properties": {
    "valori_pro_capite": {
      "type": "object",
      "required": ["art67_ccnl_2018", "art79_ccnl_2022_b"],
      "properties": {
        "art67_ccnl_2018": { "type": "number" },
        "art79_ccnl_2022_b": { "type": "number" }
      }
    },
    "limiti": {
      "type": "object",
      "required": ["incidenza_salario_accessorio", "incremento_virtuosi_dl25_2025", "incremento_pnrr_dl13_2023"],
      "properties": {
        "quota_minima_performance_individuale": { "type": "number", "minimum": 0, "maximum": 100 },
        "quota_minima_risultato_eq": { "type": "number", "minimum": 0, "maximum": 100 }
      },
      "additionalProperties": { "type": "number" }
    },
    "riferimenti_normativi": {
      "type": "object",
      "additionalProperties": { "type": "string" }
    },
    "progression_economic_values": {
      "type": "object",
      "additionalProperties": { "type": "object", "additionalProperties": { "type": "number" } }
    },
    "indennita_comparto_values": {
      "type": "object",
      "additionalProperties": { "type": "number" }
    }
  }
}"##;

/// Validate `instance` against the embedded schema; report the first violation.
#[cfg(feature = "schemaval")]
pub fn validate_value(kind: SchemaKind, instance: &Value) -> Result<(), IoError> {
    use jsonschema::{Draft, JSONSchema};

    let schema: Value = serde_json::from_str(kind.source())
        .map_err(|e| IoError::Invalid(format!("embedded {} schema: {e}", kind.name())))?;
    let compiled = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&schema)
        .map_err(|e| IoError::Invalid(format!("{} schema compile error: {e}", kind.name())))?;

    let first = match compiled.validate(instance) {
        Ok(()) => return Ok(()),
        Err(mut errors) => errors.next().map(|err| (err.instance_path.to_string(), err.to_string())),
    };
    match first {
        Some((ptr, msg)) => Err(IoError::Schema {
            pointer: if ptr.is_empty() { "/".to_string() } else { ptr },
            msg,
        }),
        None => Ok(()),
    }
}

#[cfg(not(feature = "schemaval"))]
pub fn validate_value(_kind: SchemaKind, _instance: &Value) -> Result<(), IoError> {
    Ok(())
}
