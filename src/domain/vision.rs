// Vision inspection domain model
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Number of verdicts kept in the inspection feed.
pub const FEED_CAPACITY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InspectionStatus {
    Pass,
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefectType {
    Porosity,
    #[serde(rename = "Dimension Error")]
    DimensionError,
    #[serde(rename = "Surface Crack")]
    SurfaceCrack,
}

impl DefectType {
    pub const ALL: [DefectType; 3] = [
        DefectType::Porosity,
        DefectType::DimensionError,
        DefectType::SurfaceCrack,
    ];
}

/// One synthetic inspection result.
///
/// `defect_type` is set exactly when `status` is [`InspectionStatus::Fail`];
/// use [`VisionVerdict::pass`] and [`VisionVerdict::fail`] to keep that true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionVerdict {
    pub id: String,
    pub part_name: String,
    pub status: InspectionStatus,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defect_type: Option<DefectType>,
    pub timestamp: String,
    pub segmentation_mask_id: String,
}

impl VisionVerdict {
    pub fn pass(
        id: String,
        part_name: String,
        confidence: f64,
        timestamp: String,
        segmentation_mask_id: String,
    ) -> Self {
        Self {
            id,
            part_name,
            status: InspectionStatus::Pass,
            confidence,
            defect_type: None,
            timestamp,
            segmentation_mask_id,
        }
    }

    pub fn fail(
        id: String,
        part_name: String,
        confidence: f64,
        defect: DefectType,
        timestamp: String,
        segmentation_mask_id: String,
    ) -> Self {
        Self {
            id,
            part_name,
            status: InspectionStatus::Fail,
            confidence,
            defect_type: Some(defect),
            timestamp,
            segmentation_mask_id,
        }
    }

    pub fn is_pass(&self) -> bool {
        self.status == InspectionStatus::Pass
    }
}

/// Most-recent-first list of verdicts plus the current display frame.
#[derive(Debug, Clone, Default)]
pub struct VisionFeed {
    verdicts: VecDeque<VisionVerdict>,
    frame: u32,
}

impl VisionFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a verdict, evicting the oldest past capacity.
    pub fn push(&mut self, verdict: VisionVerdict, frame: u32) {
        self.verdicts.push_front(verdict);
        self.verdicts.truncate(FEED_CAPACITY);
        self.frame = frame;
    }

    pub fn verdicts(&self) -> impl Iterator<Item = &VisionVerdict> {
        self.verdicts.iter()
    }

    pub fn newest(&self) -> Option<&VisionVerdict> {
        self.verdicts.front()
    }

    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Image shown behind the inspection overlay for the current frame.
    pub fn frame_image_url(&self) -> String {
        format!(
            "https://picsum.photos/seed/{}/1280/720?grayscale&industrial",
            self.frame
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(id: &str) -> VisionVerdict {
        VisionVerdict::pass(
            id.to_string(),
            "Engine Block Casting".to_string(),
            0.97,
            "10:00:00".to_string(),
            "M-1".to_string(),
        )
    }

    #[test]
    fn test_feed_is_newest_first_and_capped() {
        let mut feed = VisionFeed::new();
        for i in 0..15 {
            feed.push(verdict(&format!("PX-{}", 1000 + i)), i);
        }

        assert_eq!(feed.len(), FEED_CAPACITY);
        assert_eq!(feed.newest().unwrap().id, "PX-1014");
        assert_eq!(feed.verdicts().last().unwrap().id, "PX-1005");
        assert_eq!(feed.frame(), 14);
    }

    #[test]
    fn test_defect_present_only_on_fail() {
        let ok = verdict("PX-1000");
        assert!(ok.is_pass());
        assert!(ok.defect_type.is_none());

        let bad = VisionVerdict::fail(
            "PX-1001".to_string(),
            "Engine Block Casting".to_string(),
            0.98,
            DefectType::SurfaceCrack,
            "10:00:02".to_string(),
            "M-7".to_string(),
        );
        assert!(!bad.is_pass());
        assert_eq!(bad.defect_type, Some(DefectType::SurfaceCrack));
    }

    #[test]
    fn test_defect_display_names() {
        let json = serde_json::to_string(&DefectType::DimensionError).unwrap();
        assert_eq!(json, "\"Dimension Error\"");

        let pass_json = serde_json::to_value(verdict("PX-1000")).unwrap();
        assert!(pass_json.get("defectType").is_none());
        assert_eq!(pass_json["partName"], "Engine Block Casting");
    }

    #[test]
    fn test_frame_image_url_uses_seed() {
        let mut feed = VisionFeed::new();
        feed.push(verdict("PX-1000"), 42);
        assert!(feed.frame_image_url().contains("/seed/42/"));
    }
}
