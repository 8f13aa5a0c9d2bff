//! Box overlap and averaging primitives.

use vfuse_models::BoundingBox;

/// Intersection over Union of two boxes.
///
/// Returns 0.0 when the boxes do not overlap or the union has no area.
pub fn iou(a: &BoundingBox, b: &BoundingBox) -> f64 {
    let x1 = a.x1.max(b.x1);
    let y1 = a.y1.max(b.y1);
    let x2 = a.x2.min(b.x2);
    let y2 = a.y2.min(b.y2);

    let intersection = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
    let union = a.area() + b.area() - intersection;

    if union > 0.0 {
        intersection / union
    } else {
        0.0
    }
}

/// Coordinate-wise mean of a set of boxes.
///
/// Returns `None` for an empty slice.
pub fn average<'a, I>(boxes: I) -> Option<BoundingBox>
where
    I: IntoIterator<Item = &'a BoundingBox>,
{
    let mut sum = [0.0f64; 4];
    let mut count = 0usize;

    for bbox in boxes {
        sum[0] += bbox.x1;
        sum[1] += bbox.y1;
        sum[2] += bbox.x2;
        sum[3] += bbox.y2;
        count += 1;
    }

    if count == 0 {
        return None;
    }

    let n = count as f64;
    Some(BoundingBox::new(sum[0] / n, sum[1] / n, sum[2] / n, sum[3] / n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identical_boxes() {
        let b = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(approx(iou(&b, &b), 1.0));
    }

    #[test]
    fn test_partial_overlap() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(5.0, 0.0, 15.0, 10.0);
        // 50 / (100 + 100 - 50)
        assert!(approx(iou(&a, &b), 50.0 / 150.0));
        assert!(approx(iou(&a, &b), iou(&b, &a)));
    }

    #[test]
    fn test_disjoint_and_touching_boxes() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(iou(&a, &BoundingBox::new(20.0, 20.0, 30.0, 30.0)), 0.0);
        assert_eq!(iou(&a, &BoundingBox::new(10.0, 0.0, 20.0, 10.0)), 0.0);
    }

    #[test]
    fn test_zero_area_union() {
        let point = BoundingBox::new(5.0, 5.0, 5.0, 5.0);
        assert_eq!(iou(&point, &point), 0.0);
    }

    #[test]
    fn test_average() {
        let boxes = [
            BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            BoundingBox::new(2.0, 4.0, 12.0, 14.0),
        ];
        let avg = average(&boxes).unwrap();
        assert_eq!(avg, BoundingBox::new(1.0, 2.0, 11.0, 12.0));
    }

    #[test]
    fn test_average_empty() {
        let boxes: [BoundingBox; 0] = [];
        assert!(average(&boxes).is_none());
    }
}
