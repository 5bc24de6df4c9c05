use schemars::gen::SchemaSettings;
use schemars::schema::{InstanceType, RootSchema, SchemaObject, SingleOrVec};
use schemars::visit::{visit_schema_object, Visitor};

use super::model::Application;
use super::validation::MAX_AMOUNT_UNITS;

/// Pattern schemars attaches to `Decimal`, which it describes as a string by default.
const DECIMAL_PATTERN: &str = r"^-?[0-9]+(\.[0-9]+)?$";

/// JSON Schema describing the URLA 2021 v1 dynamic form.
pub fn urla_2021_v1_schema() -> RootSchema {
    SchemaSettings::draft07()
        .with_visitor(MoneyAsNumber)
        .into_generator()
        .into_root_schema_for::<Application>()
}

/// Amounts travel as JSON numbers bounded by the field checks, so the schema says so too.
#[derive(Debug, Clone)]
struct MoneyAsNumber;

impl Visitor for MoneyAsNumber {
    fn visit_schema_object(&mut self, schema: &mut SchemaObject) {
        let is_decimal = schema
            .string
            .as_ref()
            .and_then(|string| string.pattern.as_deref())
            == Some(DECIMAL_PATTERN);

        if is_decimal {
            let nullable = match &schema.instance_type {
                Some(SingleOrVec::Vec(types)) => types.contains(&InstanceType::Null),
                _ => false,
            };
            schema.instance_type = Some(if nullable {
                vec![InstanceType::Number, InstanceType::Null].into()
            } else {
                InstanceType::Number.into()
            });
            schema.string = None;
            let number = schema.number();
            number.minimum = Some(0.0);
            number.maximum = Some(MAX_AMOUNT_UNITS as f64);
        }

        visit_schema_object(self, schema);
    }
}
