//! Printer definition document parsing and validation

use std::collections::BTreeMap;

use printloop_core::CatalogError;
use serde::Deserialize;
use toml::Value;

/// Marker pattern sequences for the two section boundaries
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Markers {
    /// Ordered pattern lines whose match marks the end of the init section
    pub end_init_section: Vec<String>,
    /// Ordered pattern lines whose match marks the end of the print section
    pub end_print_section: Vec<String>,
}

/// Strategy names for locating the two section boundaries
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct StrategyNames {
    /// Strategy used for the end-of-init search
    pub end_init_section_strategy: String,
    /// Strategy used for the end-of-print search
    pub end_print_section_strategy: String,
}

/// Loop-code template section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct TemplateSection {
    /// Template source rendered once per iteration
    pub code: String,
}

/// A complete printer configuration record
///
/// The on-disk form is a TOML document with PascalCase keys:
///
/// ```toml
/// Name = "Bambu Lab A1"
///
/// [Markers]
/// EndInitSection = ["M1007 S1"]
/// EndPrintSection = ["G625"]
///
/// [SearchStrategy]
/// EndInitSectionStrategy = "after_first_appear"
/// EndPrintSectionStrategy = "after_last_appear"
///
/// [Parameters]
/// SweepZ = 1.5
///
/// [Template]
/// Code = """..."""
///
/// [Assertions]
/// LastPrintZ = [0.0, 256.0]
/// ```
///
/// Definitions are immutable once parsed; one parsed copy serves a whole
/// transformation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PrinterDefinition {
    /// Human-readable printer name
    pub name: String,
    /// Section boundary marker sequences
    pub markers: Markers,
    /// Search strategy names, resolved by the engine
    pub search_strategy: StrategyNames,
    /// Free-form template parameters; numeric values are normalized to
    /// floats on load so template arithmetic is homogeneous
    pub parameters: BTreeMap<String, Value>,
    /// Loop-code template
    pub template: TemplateSection,
    /// Safe-envelope guards: coordinate-field name to `[min, max]`
    pub assertions: BTreeMap<String, Vec<Value>>,
}

impl PrinterDefinition {
    /// Parse a definition document.
    ///
    /// The same parser serves the embedded catalog and user-supplied
    /// custom definitions. A definition without a `Name` is named
    /// `Custom-<requested_name>`.
    pub fn parse(source: &str, requested_name: &str) -> Result<Self, CatalogError> {
        let mut def: PrinterDefinition =
            toml::from_str(source).map_err(|e| CatalogError::ParseFailed {
                message: e.to_string(),
            })?;

        def.validate()?;

        if def.name.is_empty() {
            def.name = format!("Custom-{requested_name}");
        }

        def.normalize_parameters();

        Ok(def)
    }

    /// Check the required fields, naming the first missing one.
    fn validate(&self) -> Result<(), CatalogError> {
        let missing = |field: &str| CatalogError::MalformedDefinition {
            field: field.to_string(),
        };

        if self.markers.end_init_section.is_empty() {
            return Err(missing("Markers.EndInitSection"));
        }
        if self.markers.end_print_section.is_empty() {
            return Err(missing("Markers.EndPrintSection"));
        }
        if self.search_strategy.end_init_section_strategy.is_empty() {
            return Err(missing("SearchStrategy.EndInitSectionStrategy"));
        }
        if self.search_strategy.end_print_section_strategy.is_empty() {
            return Err(missing("SearchStrategy.EndPrintSectionStrategy"));
        }
        if self.template.code.is_empty() {
            return Err(missing("Template.Code"));
        }

        Ok(())
    }

    /// Coerce every integer parameter to a float.
    ///
    /// TOML distinguishes integer and float literals; templates must not.
    fn normalize_parameters(&mut self) {
        for value in self.parameters.values_mut() {
            if let Value::Integer(n) = value {
                *value = Value::Float(*n as f64);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
Name = "Test Printer"

[Markers]
EndInitSection = ["START_PRINT"]
EndPrintSection = ["END_PRINT"]

[SearchStrategy]
EndInitSectionStrategy = "after_first_appear"
EndPrintSectionStrategy = "after_last_appear"

[Parameters]
SweepZ = 1.5
TravelFeedrate = 12000
Label = "abc"

[Template]
Code = "; cycle {{ Iteration }}"

[Assertions]
LastPrintZ = [0.0, 250.0]
"#;

    #[test]
    fn test_parse_minimal() {
        let def = PrinterDefinition::parse(MINIMAL, "ignored").unwrap();
        assert_eq!(def.name, "Test Printer");
        assert_eq!(def.markers.end_init_section, vec!["START_PRINT"]);
        assert_eq!(def.markers.end_print_section, vec!["END_PRINT"]);
        assert_eq!(
            def.search_strategy.end_init_section_strategy,
            "after_first_appear"
        );
        assert_eq!(def.template.code, "; cycle {{ Iteration }}");
        assert_eq!(def.assertions["LastPrintZ"].len(), 2);
    }

    #[test]
    fn test_integer_parameters_become_floats() {
        let def = PrinterDefinition::parse(MINIMAL, "ignored").unwrap();
        assert_eq!(def.parameters["TravelFeedrate"], Value::Float(12000.0));
        assert_eq!(def.parameters["SweepZ"], Value::Float(1.5));
        assert_eq!(def.parameters["Label"], Value::String("abc".to_string()));
    }

    #[test]
    fn test_missing_name_gets_custom_prefix() {
        let source = MINIMAL.replace("Name = \"Test Printer\"", "");
        let def = PrinterDefinition::parse(&source, "my-printer").unwrap();
        assert_eq!(def.name, "Custom-my-printer");
    }

    #[test]
    fn test_missing_required_fields() {
        let cases = [
            ("EndInitSection = [\"START_PRINT\"]", "Markers.EndInitSection"),
            ("EndPrintSection = [\"END_PRINT\"]", "Markers.EndPrintSection"),
            (
                "EndInitSectionStrategy = \"after_first_appear\"",
                "SearchStrategy.EndInitSectionStrategy",
            ),
            (
                "EndPrintSectionStrategy = \"after_last_appear\"",
                "SearchStrategy.EndPrintSectionStrategy",
            ),
            ("Code = \"; cycle {{ Iteration }}\"", "Template.Code"),
        ];

        for (line, expected_field) in cases {
            let source = MINIMAL.replace(line, "");
            let err = PrinterDefinition::parse(&source, "x").unwrap_err();
            match err {
                CatalogError::MalformedDefinition { field } => {
                    assert_eq!(field, expected_field);
                }
                other => panic!("expected MalformedDefinition, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_unparseable_document() {
        let err = PrinterDefinition::parse("Name = [not toml", "x").unwrap_err();
        assert!(matches!(err, CatalogError::ParseFailed { .. }));
    }
}
