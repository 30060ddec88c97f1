pub mod bar;
pub mod canvas;
pub mod font;
pub mod pie;

pub use bar::{render_bar_chart, write_bar_chart};
pub use canvas::{Align, Canvas, Rgb};
pub use pie::{render_pie_chart, write_pie_chart};

/// Ten-colour categorical cycle (matplotlib "tab10").
pub const PALETTE: [Rgb; 10] = [
    Rgb::hex(0x1F77B4),
    Rgb::hex(0xFF7F0E),
    Rgb::hex(0x2CA02C),
    Rgb::hex(0xD62728),
    Rgb::hex(0x9467BD),
    Rgb::hex(0x8C564B),
    Rgb::hex(0xE377C2),
    Rgb::hex(0x7F7F7F),
    Rgb::hex(0xBCBD22),
    Rgb::hex(0x17BECF),
];
