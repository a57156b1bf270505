use {crate::DispatchError, base::Rect, serde::Deserialize};

/// Outcome of one detector call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DetectionResult {
    pub detected: bool,
    pub bounding_box: Option<Rect<i32>>,
    pub label: Option<String>,
}

impl DetectionResult {
    /// Nothing found.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn found(bounding_box: Rect<i32>, label: Option<String>) -> Self {
        Self {
            detected: true,
            bounding_box: Some(bounding_box),
            label,
        }
    }

    /// True when there is a box to draw.
    pub fn is_drawable(&self) -> bool {
        self.detected && self.bounding_box.is_some()
    }
}

/// Largest box coordinate or extent accepted from the detector, in pixels.
pub const MAX_COORDINATE: f64 = 1_000_000.0;

#[derive(Deserialize)]
struct WireBox {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireDetection {
    hand_detected: bool,
    #[serde(default)]
    hand_type: Option<String>,
    #[serde(default)]
    bbox: Option<WireBox>,
}

/// Parse a detector reply.
///
/// Payload: `{"handDetected": bool, "handType": string|null,
/// "bbox": {"x","y","w","h"}|null}`. Unknown fields such as `error` are
/// ignored. Box and label are dropped when nothing was detected. A box
/// with a coordinate beyond [`MAX_COORDINATE`] is rejected.
pub fn parse_detection(text: &str) -> Result<DetectionResult, DispatchError> {
    let wire: WireDetection = serde_json::from_str(text)?;
    if !wire.hand_detected {
        return Ok(DetectionResult::none());
    }
    let bounding_box = match wire.bbox {
        Some(b) => {
            if ![b.x, b.y, b.w, b.h].iter().all(|v| v.is_finite()) {
                return Err(DispatchError::Receive("non-finite bbox".to_string()));
            }
            if ![b.x, b.y, b.w, b.h].iter().all(|v| v.abs() <= MAX_COORDINATE) {
                return Err(DispatchError::Receive(format!(
                    "bbox out of range: {} {} {} {}",
                    b.x, b.y, b.w, b.h
                )));
            }
            Some(Rect::from_xywh(
                b.x.round() as i32,
                b.y.round() as i32,
                b.w.round() as i32,
                b.h.round() as i32,
            ))
        }
        None => None,
    };
    Ok(DetectionResult {
        detected: true,
        bounding_box,
        label: wire.hand_type,
    })
}
