#![allow(dead_code)]

use reaper_vars::protocol::{DisplayValue, VariableDeclaration};
use reaper_vars::{Cardinality, OutputSink};

#[derive(Default)]
pub struct RecordingSink {
    pub declarations: Vec<Vec<VariableDeclaration>>,
    pub updates: Vec<(String, DisplayValue)>,
}

impl RecordingSink {
    pub fn values_for(&self, variable_id: &str) -> Vec<DisplayValue> {
        self.updates
            .iter()
            .filter(|(id, _)| id == variable_id)
            .map(|(_, v)| v.clone())
            .collect()
    }

    pub fn last(&self, variable_id: &str) -> Option<DisplayValue> {
        self.values_for(variable_id).pop()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.updates.iter().map(|(id, _)| id.as_str()).collect()
    }
}

impl OutputSink for RecordingSink {
    fn declare(&mut self, variables: &[VariableDeclaration]) {
        self.declarations.push(variables.to_vec());
    }

    fn update(&mut self, variable_id: &str, value: DisplayValue) {
        self.updates.push((variable_id.to_string(), value));
    }
}

pub fn cardinality(tracks: u16, fx: u16) -> Cardinality {
    Cardinality::new(tracks, fx).expect("valid cardinality")
}

pub fn text(s: &str) -> DisplayValue {
    DisplayValue::Text(s.to_string())
}
