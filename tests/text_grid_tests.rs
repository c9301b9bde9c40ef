// Text grid access through the display

mod common;

use common::headless_display;
use eight_rs::display::{CellCode, DisplayError, TextFlags};

#[test]
fn test_set_cell_then_flags() {
    let mut display = headless_display(8, 4);
    let cases = [
        (0, TextFlags::empty()),
        (5, TextFlags::BLINKING),
        (17, TextFlags::INVERTED | TextFlags::UNDERLINE),
        (31, TextFlags::from_bits_retain(0xF0) | TextFlags::BLINKING),
    ];

    for &(index, flags) in &cases {
        display
            .set_cell(index, CellCode::new(index as u16, 1, 2), flags)
            .unwrap();
    }
    for &(index, flags) in &cases {
        assert_eq!(display.flags(index).unwrap(), flags);
        assert_eq!(display.code(index).unwrap().glyph(), index as u16);
    }
}

#[test]
fn test_out_of_range_access() {
    let mut display = headless_display(8, 4);
    let len = display.grid().len();

    let err = display
        .set_cell(len, CellCode::default(), TextFlags::BLINKING)
        .unwrap_err();
    assert!(matches!(err, DisplayError::OutOfRange { index, len: 32 } if index == len));
    assert!(!err.is_fatal());

    assert!(matches!(
        display.flags(len),
        Err(DisplayError::OutOfRange { .. })
    ));
    assert!(matches!(
        display.redraw_cell(len + 100),
        Err(DisplayError::OutOfRange { .. })
    ));
    assert!(display.renderer().redrawn.is_empty());
}
