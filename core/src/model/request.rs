use serde::{Deserialize, Serialize};
use std::fmt;

/// Product requested for the working set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FdsnRequestType {
    #[default]
    Waveform,
    StationXml,
    StationText,
}

impl FdsnRequestType {
    pub fn label(&self) -> &'static str {
        match self {
            FdsnRequestType::Waveform => "Waveform (Mini-SEED)",
            FdsnRequestType::StationXml => "Metadata (StationXML)",
            FdsnRequestType::StationText => "Metadata (Text)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestModel {
    pub datetime_from: String,
    pub datetime_to: String,
    pub request_type: FdsnRequestType,
}

impl Default for RequestModel {
    fn default() -> Self {
        Self {
            datetime_from: "2017-01-01T12:00:00".into(),
            datetime_to: "2018-01-01T12:00:00".into(),
            request_type: FdsnRequestType::default(),
        }
    }
}

impl fmt::Display for RequestModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Datetime: {} - {}, request type: {}",
            self.datetime_from,
            self.datetime_to,
            self.request_type.label()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_names_request_type() {
        let model = RequestModel {
            request_type: FdsnRequestType::StationXml,
            ..Default::default()
        };
        assert_eq!(
            model.to_string(),
            "Datetime: 2017-01-01T12:00:00 - 2018-01-01T12:00:00, request type: Metadata (StationXML)"
        );
    }
}
