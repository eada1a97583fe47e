use std::cell::RefCell;
use std::rc::Rc;

use super::*;

struct Recording {
    calls: Rc<RefCell<Vec<String>>>,
    out: Canvas,
}

impl Geometry for Recording {
    fn rotate(&self, frame: &Frame, rotation: Rotation) -> StimResult<Frame> {
        self.calls
            .borrow_mut()
            .push(format!("rotate:{}", rotation.yaw));
        Ok(frame.clone())
    }

    fn crop_to_fov(&self, frame: &Frame) -> StimResult<Frame> {
        self.calls.borrow_mut().push("crop".to_owned());
        Ok(frame.clone())
    }

    fn project(&self, frame: &Frame) -> StimResult<Frame> {
        self.calls.borrow_mut().push("project".to_owned());
        Ok(frame.clone())
    }

    fn mask(&self, frame: &Frame) -> StimResult<Frame> {
        self.calls.borrow_mut().push("mask".to_owned());
        Ok(frame.clone())
    }

    fn output_canvas(&self) -> Canvas {
        self.out
    }
}

fn stage(opts: StageOpts) -> (TransformStage, Rc<RefCell<Vec<String>>>) {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let g = Recording {
        calls: calls.clone(),
        out: Canvas {
            width: 4,
            height: 2,
        },
    };
    (TransformStage::new(Box::new(g), opts), calls)
}

#[test]
fn dynamic_rotation_precedes_offset_and_crop() {
    let (s, calls) = stage(StageOpts {
        rot_offset: Rotation::yaw(90.0),
        inverted: false,
    });
    let f = Frame::filled(4, 2, Channels::Gray, 7);
    let out = s.apply(&f, Rotation::yaw(10.0)).unwrap();
    assert_eq!(out.channels(), Channels::Rgb);
    assert_eq!(
        *calls.borrow(),
        vec!["rotate:10", "rotate:90", "crop", "project", "mask"]
    );
}

#[test]
fn zero_rotations_are_skipped() {
    let (s, calls) = stage(StageOpts::default());
    let f = Frame::filled(4, 2, Channels::Rgb, 7);
    s.apply(&f, Rotation::ZERO).unwrap();
    assert_eq!(*calls.borrow(), vec!["crop", "project", "mask"]);
}

#[test]
fn inverted_output_is_rotated_180() {
    let (s, _) = stage(StageOpts {
        rot_offset: Rotation::ZERO,
        inverted: true,
    });
    let mut f = Frame::filled(4, 2, Channels::Gray, 0);
    f.set_pixel(0, 0, 200);
    let out = s.apply(&f, Rotation::ZERO).unwrap();
    assert_eq!(out.pixel(3, 1), &[200, 200, 200]);
    assert_eq!(out.pixel(0, 0), &[0, 0, 0]);
}

#[test]
fn non_rgb_geometry_output_is_rejected() {
    struct GrayOut;
    impl Geometry for GrayOut {
        fn rotate(&self, frame: &Frame, _: Rotation) -> StimResult<Frame> {
            Ok(frame.clone())
        }
        fn crop_to_fov(&self, frame: &Frame) -> StimResult<Frame> {
            Ok(frame.clone())
        }
        fn project(&self, frame: &Frame) -> StimResult<Frame> {
            Ok(Frame::gray(frame.canvas(), 0))
        }
        fn mask(&self, frame: &Frame) -> StimResult<Frame> {
            Ok(frame.clone())
        }
        fn output_canvas(&self) -> Canvas {
            Canvas {
                width: 1,
                height: 1,
            }
        }
    }
    let s = TransformStage::new(Box::new(GrayOut), StageOpts::default());
    let err = s
        .apply(&Frame::filled(2, 2, Channels::Rgb, 0), Rotation::ZERO)
        .unwrap_err();
    assert!(matches!(err, StimError::Geometry(_)));
}
