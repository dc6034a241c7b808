mod app;
mod chart;
mod controller;
mod data;
mod dropdown;
mod label;
mod map;
mod projection;
mod transition;

fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(app::App);
}
