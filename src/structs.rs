use crate::ForgeError;
use crate::features::aspect_fit::ResizePlan;
use crate::features::error::ImageError;
use crate::features::metadata_plan::MetadataPlan;
use crate::tools::error::ToolError;
use serde::Serialize;
use std::path::PathBuf;

/// Why an image was left out of the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "camelCase")]
pub enum SkipReason {
    InvalidDimensions(String),
    ExternalTool(String),
}

impl From<&ToolError> for SkipReason {
    fn from(error: &ToolError) -> Self {
        match error {
            ToolError::Image(ImageError::InvalidDimensions { .. }) => {
                Self::InvalidDimensions(error.to_string())
            }
            other => Self::ExternalTool(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ImageOutcome {
    /// Dry run: everything was decided, nothing was written.
    Planned {
        output: PathBuf,
        resize: ResizePlan,
        plan: MetadataPlan,
    },
    Written {
        output: PathBuf,
        resize: ResizePlan,
        plan: MetadataPlan,
    },
    Skipped {
        reason: SkipReason,
    },
}

impl ImageOutcome {
    pub fn plan(&self) -> Option<&MetadataPlan> {
        match self {
            Self::Planned { plan, .. } | Self::Written { plan, .. } => Some(plan),
            Self::Skipped { .. } => None,
        }
    }

    pub fn output(&self) -> Option<&PathBuf> {
        match self {
            Self::Planned { output, .. } | Self::Written { output, .. } => Some(output),
            Self::Skipped { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageReport {
    pub source: PathBuf,
    #[serde(flatten)]
    pub outcome: ImageOutcome,
}

/// Per-image results of a batch, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub images: Vec<ImageReport>,
}

impl BatchReport {
    pub fn written_count(&self) -> usize {
        self.count(|o| matches!(o, ImageOutcome::Written { .. }))
    }

    pub fn planned_count(&self) -> usize {
        self.count(|o| matches!(o, ImageOutcome::Planned { .. }))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|o| matches!(o, ImageOutcome::Skipped { .. }))
    }

    pub fn to_json_pretty(&self) -> Result<String, ForgeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn count(&self, predicate: impl Fn(&ImageOutcome) -> bool) -> usize {
        self.images.iter().filter(|r| predicate(&r.outcome)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::aspect_fit::ResolvedFit;
    use serde_json::json;
    use std::path::Path;

    #[test]
    fn test_skip_reason_classification() {
        let invalid = ToolError::Image(ImageError::InvalidDimensions {
            path: PathBuf::from("notes.txt"),
            reason: "not an image".to_string(),
        });
        assert!(matches!(SkipReason::from(&invalid), SkipReason::InvalidDimensions(_)));

        let failed = ToolError::NotUpdated {
            path: PathBuf::from("a.jpg"),
            output: "0 image files updated".to_string(),
        };
        assert!(matches!(SkipReason::from(&failed), SkipReason::ExternalTool(_)));
    }

    #[test]
    fn test_report_serialization() {
        let report = BatchReport {
            images: vec![
                ImageReport {
                    source: PathBuf::from("in/a.png"),
                    outcome: ImageOutcome::Written {
                        output: PathBuf::from("out/a.jpg"),
                        resize: ResizePlan {
                            target_width: 2592,
                            target_height: 1936,
                            mode: ResolvedFit::Crop,
                        },
                        plan: MetadataPlan::default(),
                    },
                },
                ImageReport {
                    source: PathBuf::from("in/b.txt"),
                    outcome: ImageOutcome::Skipped {
                        reason: SkipReason::InvalidDimensions("no size".to_string()),
                    },
                },
            ],
        };
        assert_eq!(report.written_count(), 1);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.planned_count(), 0);
        assert_eq!(report.images[0].outcome.output().map(|p| p.as_path()), Some(Path::new("out/a.jpg")));

        let pretty = report.to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&pretty).unwrap();
        assert_eq!(value["images"][0]["status"], json!("written"));
        assert_eq!(value["images"][0]["resize"]["mode"], json!("crop"));
        assert_eq!(value["images"][1]["status"], json!("skipped"));
        assert_eq!(
            value["images"][1]["reason"],
            json!({"kind": "invalidDimensions", "message": "no size"})
        );
    }
}
