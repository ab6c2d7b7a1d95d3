mod common;

use approx::assert_relative_eq;
use common::{fetcher, FakeFetcher, FakeHost};
use glam::Vec2;
use std::time::Duration;
use tour360::input::Cursor;
use tour360::render::{DrawOp, Paint};
use tour360::viewer::ImageSlot;
use tour360::{
    Control, InputEvent, Key, PanoramaViewer, PointerSample, ProjectionMode, ViewerConfig,
    ViewerError,
};

const WAIT: Duration = Duration::from_secs(5);

fn mount_with(f: FakeFetcher) -> PanoramaViewer<FakeHost> {
    PanoramaViewer::mount_with_fetcher(
        Some(FakeHost::default()),
        ViewerConfig::default(),
        fetcher(f),
    )
    .expect("mount")
}

fn mount() -> PanoramaViewer<FakeHost> {
    mount_with(FakeFetcher::default())
}

fn down(x: f32, y: f32) -> InputEvent {
    InputEvent::PointerDown(PointerSample::new(x, y))
}

fn mv(x: f32, y: f32) -> InputEvent {
    InputEvent::PointerMove(PointerSample::new(x, y))
}

#[test]
fn missing_mount_point_is_a_setup_error() {
    let result = PanoramaViewer::<FakeHost>::mount(None, ViewerConfig::default());
    assert!(matches!(result, Err(ViewerError::MountMissing)));
}

#[test]
fn inverted_zoom_heights_refuse_to_mount() {
    let config = ViewerConfig {
        min_height: 900.0,
        max_height: 800.0,
        ..ViewerConfig::default()
    };
    let result = PanoramaViewer::mount(Some(FakeHost::default()), config);
    assert!(matches!(result, Err(ViewerError::InvalidConfig(_))));
}

#[test]
fn base_height_outside_bounds_refuses_to_mount() {
    let config = ViewerConfig {
        base_height: 1000.0,
        ..ViewerConfig::default()
    };
    let result = PanoramaViewer::mount(Some(FakeHost::default()), config);
    assert!(matches!(result, Err(ViewerError::InvalidConfig(_))));
}

#[test]
fn mount_draws_placeholder_and_sizes_element() {
    let viewer = mount();
    assert_eq!(viewer.render_count(), 1);
    assert_eq!(viewer.host().height, 500.0);
    assert_eq!(viewer.host().cursor, Some(Cursor::Grab));

    let frame = viewer.frame();
    assert_eq!(frame.size, Vec2::new(800.0, 500.0));
    assert!(matches!(
        frame.ops[1],
        DrawOp::Fill {
            paint: Paint::LinearGradient { .. },
            ..
        }
    ));
    assert!(matches!(
        &frame.ops[2],
        DrawOp::Label { text, .. } if text == "360 Virtual Tour - Load Image URL"
    ));
}

#[test]
fn controls_are_built_once_with_help_caption() {
    let mut viewer = mount();
    let before = viewer.controls().clone();
    let labels: Vec<_> = before.buttons.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, ["+", "-", "Reset", "Fullscreen"]);
    assert!(before.help.contains("Press R to reset"));

    viewer.click(Control::ZoomIn);
    viewer.click(Control::Reset);
    assert_eq!(viewer.controls(), &before);
}

#[test]
fn loaded_image_is_drawn_twice_at_wrap_offsets() {
    let mut viewer = mount_with(FakeFetcher::default().with("pano.jpg", 2000));
    viewer.load_tour_image("pano.jpg");
    assert!(viewer.image_slot().is_loading());
    assert!(viewer.wait_for_image_load(WAIT));

    assert_eq!(
        viewer.frame().image_origins(),
        vec![Vec2::new(0.0, 0.0), Vec2::new(2000.0, 0.0)]
    );

    viewer.handle_event(&InputEvent::KeyDown(Key::ArrowRight));
    let origins = viewer.frame().image_origins();
    let h = 5.0 / 360.0 * 2000.0;
    assert_relative_eq!(origins[0].x, -h);
    assert_relative_eq!(origins[1].x, 2000.0 - h);
}

#[test]
fn previous_frame_stays_while_loading() {
    let f = FakeFetcher::default().with("slow.jpg", 100);
    let release = f.gate("slow.jpg");
    let mut viewer = mount_with(f);
    let placeholder = viewer.frame().clone();

    viewer.load_tour_image("slow.jpg");
    viewer.handle_event(&InputEvent::KeyDown(Key::ArrowLeft));
    assert_eq!(viewer.frame(), &placeholder);
    assert_eq!(viewer.render_count(), 1);

    release.send(()).unwrap();
    assert!(viewer.wait_for_image_load(WAIT));
    assert_eq!(viewer.frame().image_origins().len(), 2);
}

#[test]
fn stale_completion_is_discarded() {
    let f = FakeFetcher::default().with("old.jpg", 1000).with("new.jpg", 3000);
    let release_old = f.gate("old.jpg");
    let mut viewer = mount_with(f);

    viewer.load_tour_image("old.jpg");
    viewer.load_tour_image("new.jpg");
    assert!(viewer.wait_for_image_load(WAIT));
    assert_eq!(viewer.image_slot().url(), Some("new.jpg"));

    release_old.send(()).unwrap();
    assert!(!viewer.wait_for_image_load(WAIT));
    assert_eq!(viewer.image_slot().url(), Some("new.jpg"));
    assert_eq!(viewer.frame().image_origins()[1], Vec2::new(3000.0, 0.0));
}

#[test]
fn failed_load_degrades_to_placeholder() {
    let mut viewer = mount_with(FakeFetcher::default().with("pano.jpg", 800));
    viewer.load_tour_image("pano.jpg");
    viewer.wait_for_image_load(WAIT);
    viewer.load_tour_image("missing.jpg");
    assert!(viewer.wait_for_image_load(WAIT));

    assert!(matches!(viewer.image_slot(), ImageSlot::Failed { .. }));
    assert!(viewer.frame().image_origins().is_empty());
    assert!(matches!(viewer.frame().ops[2], DrawOp::Label { .. }));
}

#[test]
fn image_swap_mid_drag_keeps_the_drag() {
    let mut viewer = mount_with(FakeFetcher::default().with("a.jpg", 720));
    viewer.handle_event(&down(0.0, 0.0));
    viewer.load_tour_image("a.jpg");
    viewer.wait_for_image_load(WAIT);
    assert!(viewer.is_dragging());

    viewer.handle_event(&mv(20.0, 0.0));
    assert_relative_eq!(viewer.view().yaw(), 10.0);
    assert_relative_eq!(viewer.frame().image_origins()[0].x, -20.0);
}

#[test]
fn pointer_scenario() {
    let mut viewer = mount();
    viewer.handle_event(&down(100.0, 100.0));
    assert_eq!(viewer.host().cursor, Some(Cursor::Grabbing));
    viewer.handle_event(&mv(150.0, 130.0));
    assert_relative_eq!(viewer.view().yaw(), 25.0);
    assert_relative_eq!(viewer.view().pitch(), 15.0);

    viewer.handle_event(&InputEvent::PointerUp);
    assert_eq!(viewer.host().cursor, Some(Cursor::Grab));
    let count = viewer.render_count();
    viewer.handle_event(&mv(400.0, 400.0));
    assert_relative_eq!(viewer.view().yaw(), 25.0);
    assert_eq!(viewer.render_count(), count);
}

#[test]
fn two_touch_points_do_not_rotate() {
    let mut viewer = mount();
    let t = PointerSample::new;
    viewer.handle_event(&InputEvent::TouchStart(vec![t(0.0, 0.0)]));
    viewer.handle_event(&InputEvent::TouchMove(vec![t(40.0, 40.0), t(90.0, 10.0)]));
    assert_eq!(viewer.view().yaw(), 0.0);
    assert_eq!(viewer.view().pitch(), 0.0);
}

#[test]
fn r_key_resets_rotation_only() {
    let mut viewer = mount();
    viewer.handle_event(&down(0.0, 0.0));
    viewer.handle_event(&mv(-333.0, 77.0));
    viewer.handle_event(&InputEvent::PointerUp);
    viewer.click(Control::ZoomIn);
    let zoom = viewer.view().zoom();

    for key in ['R', 'r'] {
        viewer.handle_event(&InputEvent::KeyDown(Key::ArrowRight));
        viewer.handle_event(&InputEvent::KeyDown(Key::Character(key)));
        assert_eq!((viewer.view().yaw(), viewer.view().pitch()), (0.0, 0.0));
        assert_eq!(viewer.view().zoom(), zoom);
    }
}

#[test]
fn wheel_down_zooms_out_to_the_minimum() {
    let mut viewer = mount();
    let min = ViewerConfig::default().zoom_bounds().min;
    let mut expected = viewer.view().zoom();
    for _ in 0..10 {
        viewer.handle_event(&InputEvent::Wheel { delta_y: 1.0 });
        expected = (expected * 0.9).max(min);
        assert_eq!(viewer.view().zoom(), expected);
    }
    assert_eq!(viewer.view().zoom(), min);
    assert_relative_eq!(viewer.host().height, 300.0, epsilon = 1e-3);
}

#[test]
fn wheel_up_zooms_in_and_resizes_element() {
    let mut viewer = mount();
    viewer.handle_event(&InputEvent::Wheel { delta_y: -1.0 });
    assert_relative_eq!(viewer.view().zoom(), 1.1);
    assert_relative_eq!(viewer.host().height, 550.0, epsilon = 1e-3);
    for _ in 0..20 {
        viewer.handle_event(&InputEvent::Wheel { delta_y: -1.0 });
    }
    assert_relative_eq!(viewer.host().height, 800.0, epsilon = 1e-3);
}

#[test]
fn each_click_renders_exactly_once() {
    let mut viewer = mount();
    for control in Control::ALL {
        let before = viewer.render_count();
        viewer.click(control);
        assert_eq!(viewer.render_count(), before + 1, "{control:?}");
    }
}

#[test]
fn fullscreen_toggles_through_the_host() {
    let mut viewer = mount();
    viewer.handle_event(&InputEvent::KeyDown(Key::Space));
    assert!(viewer.view().is_fullscreen());
    assert!(viewer.host().fullscreen);

    viewer.click(Control::Fullscreen);
    assert!(!viewer.view().is_fullscreen());
    assert!(!viewer.host().fullscreen);
}

#[test]
fn refused_fullscreen_leaves_state_alone() {
    let mut host = FakeHost::default();
    host.refuse_fullscreen = true;
    let mut viewer = PanoramaViewer::mount(Some(host), ViewerConfig::default()).unwrap();
    let before = viewer.render_count();

    viewer.toggle_fullscreen();
    assert!(!viewer.view().is_fullscreen());
    assert_eq!(viewer.render_count(), before);
    assert_eq!(viewer.host().fullscreen_requests, 1);
}

#[test]
fn host_side_exit_keeps_rotation_and_zoom() {
    let mut viewer = mount();
    viewer.toggle_fullscreen();
    viewer.handle_event(&InputEvent::KeyDown(Key::ArrowLeft));
    viewer.click(Control::ZoomOut);
    let (yaw, zoom) = (viewer.view().yaw(), viewer.view().zoom());

    viewer.host_mut().fullscreen = false;
    viewer.sync_fullscreen();
    assert!(!viewer.view().is_fullscreen());
    assert_eq!(viewer.view().yaw(), yaw);
    assert_eq!(viewer.view().zoom(), zoom);
}

#[test]
fn frame_follows_element_size() {
    let mut viewer = mount();
    viewer.host_mut().size = Vec2::new(320.0, 240.0);
    viewer.handle_event(&InputEvent::KeyDown(Key::ArrowUp));
    assert_eq!(viewer.frame().size, Vec2::new(320.0, 240.0));
}

#[test]
fn projection_switch_redraws_with_rotation() {
    let mut viewer = mount();
    viewer.handle_event(&InputEvent::KeyDown(Key::ArrowRight));
    assert_eq!(viewer.frame().rotation, 0.0);

    viewer.set_projection(ProjectionMode::Composed);
    assert_relative_eq!(viewer.frame().rotation, 5f32.to_radians());
}
