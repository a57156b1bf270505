use base::{Rect, Vec2};

#[test]
fn test_rect_accessors() {
    let r = Rect::from_xywh(10, 20, 30, 40);
    assert_eq!(r.x(), 10);
    assert_eq!(r.y(), 20);
    assert_eq!(r.width(), 30);
    assert_eq!(r.height(), 40);
    assert_eq!(r.max(), Vec2::new(40, 60));
}

#[test]
fn test_clip_huge_rect_saturates() {
    let r = Rect::from_xywh(10, -20, i32::MAX, i32::MAX);
    assert_eq!(r.clip(Vec2::new(100, 100)), Some(Rect::from_xywh(10, 0, 90, 100)));

    let far = Rect::from_xywh(i32::MIN, i32::MIN, 16, 16);
    assert_eq!(far.clip(Vec2::new(100, 100)), None);
}

#[test]
fn test_clip_inside_is_unchanged() {
    let r = Rect::from_xywh(5, 5, 10, 10);
    assert_eq!(r.clip(Vec2::new(100, 100)), Some(r));
}

#[test]
fn test_clip_negative_origin() {
    let r = Rect::from_xywh(-5, -10, 20, 20);
    assert_eq!(r.clip(Vec2::new(100, 100)), Some(Rect::from_xywh(0, 0, 15, 10)));
}

#[test]
fn test_clip_outside_is_none() {
    let r = Rect::from_xywh(200, 200, 10, 10);
    assert_eq!(r.clip(Vec2::new(100, 100)), None);
}

#[test]
fn test_vec2_area_and_display() {
    let size = Vec2::new(640usize, 480usize);
    assert_eq!(size.area(), 307200);
    assert_eq!(format!("{}", size), "640x480");
    assert_eq!(size.to_i32(), Vec2::new(640, 480));
}
