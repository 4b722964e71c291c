pub mod orbit_vis3d;
pub mod headless;
