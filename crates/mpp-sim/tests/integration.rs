//! Integration tests for the MPP Life simulator binary's supporting
//! modules: pattern loading onto a live `Controller`, and framebuffer
//! capture.

use mpp_controller::Controller;

#[path = "../src/capture.rs"]
mod capture;
#[path = "../src/seed.rs"]
mod seed;
#[path = "../src/sink.rs"]
mod sink;

use sink::Framebuffer;

fn write_glider(path: &std::path::Path) {
    std::fs::write(path, "#Life 1.05\r\n#P 0 0\r\n.*.\r\n..*\r\n***\r\n").unwrap();
}

#[test]
fn loading_a_pattern_seeds_the_controller() {
    let mut path = std::env::temp_dir();
    path.push(format!("mpp-sim-test-glider-{}.lif", std::process::id()));
    write_glider(&path);

    let mut controller = Controller::new(mpp_controller::MIN_MEMORY_SIZE);
    seed::seed_from_pattern(&mut controller, &path).unwrap();
    let _ = std::fs::remove_file(&path);

    // The glider's bottom row has all three columns live around (128, 128).
    assert!(controller.router().read_2d(128, 130));
    assert!(controller.router().read_2d(129, 130));
    assert!(controller.router().read_2d(130, 130));
}

#[test]
fn life_step_output_can_be_captured_as_png() {
    let mut controller = Controller::new(mpp_controller::MIN_MEMORY_SIZE);
    controller.router().unicast_2d(10, 10, true);
    controller.router().unicast_2d(11, 10, true);
    controller.router().unicast_2d(10, 11, true);
    controller.router().unicast_2d(11, 11, true);

    let mut fb = Framebuffer::new();
    controller.life_step(&mut fb);

    let mut dir = std::env::temp_dir();
    dir.push(format!("mpp-sim-test-out-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("frame.png");
    capture::save_screenshot(&fb, &path).unwrap();
    assert!(path.exists());
    let _ = std::fs::remove_dir_all(&dir);
}
