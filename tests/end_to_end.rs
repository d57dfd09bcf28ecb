use std::fs;
use tempfile::tempdir;
use vecscene::control::{parse_command, CommandRunner, Flow};
use vecscene::shapes::Style;
use vecscene::{Canvas, Color, Point, Scene, Shape, ShapeKind};

const RED: Color = Color::rgb(255, 0, 0);
const BLUE: Color = Color::rgb(0, 0, 255);

#[test]
fn test_csv_line_renders_exact_pixels() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("line.csv");
    fs::write(&path, "Line,0,false,#000000,#000000,(0,0) (10,0)\n").unwrap();

    let mut canvas = Canvas::new(500, 500);
    let failures = canvas.load(&path).unwrap();
    assert!(failures.is_empty());

    let surface = canvas.surface();
    assert_eq!(surface.count_color(Color::BLACK), 11);
    for x in 0..=10 {
        assert_eq!(surface.get_pixel(x, 0), Some(Color::BLACK));
    }
    assert_eq!(surface.get_pixel(11, 0), Some(Color::WHITE));
}

#[test]
fn test_higher_depth_line_paints_over_filled_circle() {
    let mut canvas = Canvas::new(100, 100);
    canvas.add_shape(Shape::circle(
        Point::new(50, 50),
        Point::new(55, 50),
        Style::new(true, RED, RED),
    ));
    canvas.add_shape(Shape::line(
        Point::new(40, 50),
        Point::new(60, 50),
        Style::outline(BLUE),
    ));

    let surface = canvas.surface();
    for x in 40..=60 {
        assert_eq!(surface.get_pixel(x, 50), Some(BLUE), "x = {}", x);
    }
    assert_eq!(surface.get_pixel(50, 47), Some(RED));
}

#[test]
fn test_reordering_puts_circle_over_line() {
    let mut canvas = Canvas::new(100, 100);
    canvas.add_shape(Shape::circle(
        Point::new(50, 50),
        Point::new(55, 50),
        Style::new(true, RED, RED),
    ));
    canvas.add_shape(Shape::line(
        Point::new(40, 50),
        Point::new(60, 50),
        Style::outline(BLUE),
    ));

    // Moving the line one step earlier leaves the circle drawn last
    assert!(canvas.select_layer(1));
    assert!(canvas.move_current_up());
    assert_eq!(canvas.current_layer(), Some(0));
    assert_eq!(canvas.scene().shape_at(1).map(Shape::kind), Some(ShapeKind::Circle));
    assert_eq!(canvas.surface().get_pixel(50, 50), Some(RED));
    assert_eq!(canvas.surface().get_pixel(40, 50), Some(BLUE));
}

#[test]
fn test_malformed_records_are_reported_and_rest_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mixed.csv");
    let text = "\
ShapeType,ZBufferPosition,IsFilled,BorderColor,FillingColor,Points
Rectangle,0,true,#ff0000,#0000ff,(10,10) (30,10) (30,30) (10,30)
Triangle,1,false,#000000,#000000,(0,0) (1,1)
Circle,2,false,#000000,#000000,(50,50)
Line,3,false,#000000,#000000,(5,40) (40,40)
";
    fs::write(&path, text).unwrap();

    let report = Scene::load(&path).unwrap();
    assert!(!report.is_clean());
    let lines: Vec<usize> = report.failures.iter().map(|(line, _)| *line).collect();
    assert_eq!(lines, vec![3, 4]);
    assert_eq!(report.scene.len(), 2);

    let mut canvas = Canvas::new(64, 64);
    canvas.replace_scene(report);
    assert_eq!(canvas.surface().get_pixel(20, 20), Some(BLUE));
    assert_eq!(canvas.surface().get_pixel(10, 10), Some(RED));
}

#[test]
fn test_scene_survives_json_and_csv_conversion() {
    let dir = tempdir().unwrap();
    let mut canvas = Canvas::new(80, 80);
    canvas.add_shape(
        Shape::polygon(
            vec![Point::new(10, 10), Point::new(60, 15), Point::new(30, 50)],
            Style::new(true, BLUE, RED),
        )
        .unwrap(),
    );
    canvas.add_shape(
        Shape::bezier(
            vec![Point::new(5, 70), Point::new(40, 5), Point::new(75, 70)],
            Style::outline(Color::BLACK),
        )
        .unwrap(),
    );

    let json = dir.path().join("scene.json");
    let csv = dir.path().join("scene.csv");
    canvas.save(&json).unwrap();
    let report = Scene::load(&json).unwrap();
    assert!(report.is_clean());
    report.scene.save(&csv).unwrap();

    let mut reloaded = Canvas::new(80, 80);
    assert!(reloaded.load(&csv).unwrap().is_empty());
    assert_eq!(reloaded.surface().as_bytes(), canvas.surface().as_bytes());
}

#[test]
fn test_script_builds_and_exports_scene() {
    let dir = tempdir().unwrap();
    let png = dir.path().join("out.png");
    let script = format!(
        "\
# two shapes then a transform
fill on
fillcolor #ff0000
rect 10 10 30 30
fill off
border #0000ff
line 0 5 49 5
select 0
move 5 5
export {}
quit
line 0 0 10 10
",
        png.display()
    );

    let mut canvas = Canvas::new(50, 50);
    let mut runner = CommandRunner::new(Style::default());
    let failures = runner.run_script(&mut canvas, &script);
    assert!(failures.is_empty(), "{:?}", failures);

    // Quit stops the script before the last line
    assert_eq!(canvas.scene().len(), 2);
    assert_eq!(canvas.surface().get_pixel(25, 25), Some(RED));
    assert_eq!(canvas.surface().get_pixel(12, 12), Some(Color::WHITE));
    assert_eq!(canvas.surface().get_pixel(20, 5), Some(BLUE));

    let image = image::open(&png).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (50, 50));
    assert_eq!(image.get_pixel(25, 25).0, [255, 0, 0, 255]);
}

#[test]
fn test_bad_command_does_not_stop_session() {
    let mut canvas = Canvas::new(50, 50);
    let mut runner = CommandRunner::new(Style::default());

    assert!(parse_command("frobnicate 1 2").is_err());
    let command = parse_command("circle 25 25 25 30").unwrap();
    assert_eq!(runner.run(&mut canvas, command).unwrap(), Flow::Continue);
    assert_eq!(canvas.scene().len(), 1);
    assert_eq!(canvas.surface().get_pixel(25, 20), Some(Color::BLACK));
}

#[test]
fn test_extreme_coordinates_never_abort_a_redraw() {
    let mut canvas = Canvas::new(100, 100);
    let report =
        Scene::from_csv("Polygon,0,false,#000000,#000000,(20,20) (-2147483648,0) (100,100)");
    assert!(canvas.replace_scene(report).is_empty());
    assert_eq!(canvas.surface().get_pixel(20, 20), Some(Color::BLACK));

    canvas.add_shape(
        Shape::polygon(
            vec![
                Point::new(10, 10),
                Point::new(40, 12),
                Point::new(45, 30),
                Point::new(20, 44),
                Point::new(5, 25),
            ],
            Style::outline(BLUE),
        )
        .unwrap(),
    );
    assert!(canvas.scale(1e12, 1e12));
    assert!(canvas.translate(i32::MAX, i32::MAX));
    assert!(canvas.rotate(45.0));
    assert_eq!(canvas.scene().len(), 2);
}

#[test]
fn test_enormous_circle_redraw_is_cheap() {
    let mut canvas = Canvas::new(100, 100);
    canvas.add_shape(Shape::circle(
        Point::new(50, 50),
        Point::new(50, 300_000_050),
        Style::outline(BLUE),
    ));
    assert_eq!(canvas.surface().count_color(Color::WHITE), 100 * 100);

    assert!(canvas.set_layer_filled(0, true));
    assert_eq!(canvas.surface().count_color(Color::WHITE), 0);
}
