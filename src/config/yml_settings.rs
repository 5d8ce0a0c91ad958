use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{BodyEncoding, HttpMethod, RequestTemplate};

/// One operation as declared in a templates YAML file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct TemplateSettings {
    pub operation: String,
    pub method: HttpMethod,
    pub url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query: Vec<QuerySetting>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, OneOrMany>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_encoding: Option<BodyEncoding>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct QuerySetting {
    pub name: String,
    pub value: String,
}

/// A header declared with a single pattern or a list of them
#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

impl From<TemplateSettings> for RequestTemplate {
    fn from(value: TemplateSettings) -> Self {
        let mut template = RequestTemplate::for_operation(value.operation);
        template.set_method(value.method).set_url_pattern(value.url);

        for query in value.query {
            template.add_query_pattern(query.name, query.value);
        }
        for (name, patterns) in value.headers {
            for pattern in patterns.into_vec() {
                template.add_header_pattern(name.clone(), pattern);
            }
        }
        if let Some(encoding) = value.body_encoding {
            template.set_body_encoding(encoding);
        }
        if let Some(body) = value.body {
            template.set_body_pattern(body);
        }
        template
    }
}
