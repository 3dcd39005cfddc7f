use jdrkit_core::{Angle, Line, Point, Unit};
use jdrkit_designer::{
    DrawObject, Drawing, JoinKind, OutlineSegment, Path, Pattern, PatternMode, Shape, ShapeGeometry, SymmetricPath,
};
use tempfile::TempDir;

fn outline(shape: &Shape) -> Vec<OutlineSegment> {
    shape.outline().collect::<Result<_, _>>().unwrap()
}

fn sample_drawing() -> Drawing {
    let mut drawing = Drawing::new("Sampler", Unit::Cm);

    let mut frame = Path::builder(Point::new(0.0, 0.0))
        .line_to(Point::new(5.0, 0.0))
        .line_to(Point::new(5.0, 5.0))
        .close_sub_path()
        .build()
        .unwrap();
    frame.close().unwrap();
    drawing.add(DrawObject::new("frame", frame));

    let half = Path::builder(Point::new(1.0, 1.0))
        .curve_to(Point::new(0.0, 2.0), Point::new(0.5, 3.0), Point::new(1.5, 4.0))
        .build()
        .unwrap();
    let mut vase = SymmetricPath::new(half, Line::new(Point::new(2.0, 0.0), Point::new(2.0, 1.0))).unwrap();
    vase.set_join(JoinKind::Bezier).unwrap();
    vase.set_closed(Some(JoinKind::Line)).unwrap();
    drawing.add(DrawObject::new("vase", vase));

    let petal = Path::builder(Point::new(0.5, 0.0))
        .curve_to(Point::new(1.0, 0.5), Point::new(2.0, 0.5), Point::new(2.5, 0.0))
        .build()
        .unwrap();
    let mut flower = Pattern::rotational(petal.into(), Point::new(0.0, 0.0), Angle::degrees(60.0), 5).unwrap();
    flower.set_mode(PatternMode::Multi);
    drawing.add(DrawObject::new("flower", flower));

    drawing
}

#[test]
fn test_save_and_load_preserves_geometry() {
    let dir = TempDir::new().unwrap();
    let file_path = dir.path().join("sampler.json");

    let drawing = sample_drawing();
    drawing.save_to_file(&file_path).unwrap();
    let loaded = Drawing::load_from_file(&file_path).unwrap();

    assert_eq!(loaded.metadata.name, "Sampler");
    assert_eq!(loaded.storage_unit, Unit::Cm);
    assert_eq!(loaded.objects.len(), 3);
    for (before, after) in drawing.objects.iter().zip(&loaded.objects) {
        assert_eq!(before.name, after.name);
        assert_eq!(before.shape.kind_name(), after.shape.kind_name());
        assert_eq!(before.shape.is_closed(), after.shape.is_closed());
        assert_eq!(outline(&before.shape), outline(&after.shape));
    }
}

#[test]
fn test_loaded_pattern_keeps_its_settings() {
    let dir = TempDir::new().unwrap();
    let file_path = dir.path().join("flower.json");
    sample_drawing().save_to_file(&file_path).unwrap();

    let loaded = Drawing::load_from_file(&file_path).unwrap();
    let pattern = loaded.objects[2].shape.as_pattern().unwrap();
    assert_eq!(pattern.replicas(), 5);
    assert_eq!(pattern.mode(), PatternMode::Multi);
    assert!(pattern.show_original());
    assert_eq!(pattern.copies(), 6);
}

#[test]
fn test_loaded_path_stays_editable() {
    let dir = TempDir::new().unwrap();
    let file_path = dir.path().join("frame.json");
    sample_drawing().save_to_file(&file_path).unwrap();

    let mut loaded = Drawing::load_from_file(&file_path).unwrap();
    let frame = loaded.objects[0].shape.as_path_mut().unwrap();
    // shared vertices are rebuilt, so moving the corner bends both lines
    let corner = frame.segment(0).unwrap().end();
    frame.point_mut(corner).unwrap().pos = Point::new(6.0, -1.0);
    assert_eq!(frame.geometry(1).unwrap().start(), Point::new(6.0, -1.0));
}

#[test]
fn test_invalid_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let file_path = dir.path().join("broken.json");
    std::fs::write(&file_path, "{ \"version\": \"1.0\", \"objects\": [").unwrap();

    let err = Drawing::load_from_file(&file_path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse drawing file"));
}

#[test]
fn test_missing_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let err = Drawing::load_from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(err.to_string().contains("Failed to read drawing file"));
}
