use approx::assert_relative_eq;
use pixelmill_filters::color::{Grayscale, Invert};
use pixelmill_filters::edge::EdgeDecision;
use pixelmill_filters::engine::{apply, FilterOutcome, NullProgress, PixelTransform, ProgressSink};
use pixelmill_filters::enhance::{ChannelRanges, Autolevels, IntensityRange, LinearStretch};
use pixelmill_filters::error::FilterError;
use pixelmill_filters::filter::{kernels, Convolution, Emboss, Median};
use pixelmill_filters::morphology::{close, open, StructuringElement};
use pixelmill_image::{Image, ImageSize};

/// Progress sink that records reports and can be pre-cancelled.
struct Recorder {
    reports: Vec<u32>,
    cancelled: bool,
}

impl Recorder {
    fn new(cancelled: bool) -> Self {
        Self {
            reports: Vec::new(),
            cancelled,
        }
    }
}

impl ProgressSink for Recorder {
    fn report(&mut self, percent: u32) {
        self.reports.push(percent);
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

fn run<const C: usize>(
    src: &Image<C>,
    transform: &impl PixelTransform<C>,
) -> Result<Image<C>, FilterError> {
    Ok(apply(src, transform, &mut NullProgress)?
        .into_image()
        .expect("not cancelled"))
}

fn noisy_image(width: usize, height: usize) -> Image<3> {
    // a deterministic but non-uniform test pattern
    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            data.push(((x * 37 + y * 17) % 256) as u8);
            data.push(((x * 11 + y * 53) % 256) as u8);
            data.push(((x * 71 + y * 3) % 256) as u8);
        }
    }
    Image::new(ImageSize { width, height }, data).unwrap()
}

#[test]
fn invert_is_involutive() -> Result<(), FilterError> {
    let src = noisy_image(8, 6);
    let twice = run(&run(&src, &Invert)?, &Invert)?;
    assert_eq!(twice, src);

    Ok(())
}

#[test]
fn grayscale_output_is_gray_everywhere() -> Result<(), FilterError> {
    let src = noisy_image(7, 5);
    let dst = run(&src, &Grayscale)?;
    for y in 0..5 {
        for x in 0..7 {
            let [r, g, b] = dst.get_pixel(x, y)?;
            assert_eq!(r, g);
            assert_eq!(g, b);
        }
    }

    Ok(())
}

#[test]
fn blur_kernels_sum_to_one() {
    assert_relative_eq!(kernels::box_blur().sum(), 1.0, epsilon = 1e-6);
    assert_relative_eq!(kernels::gaussian_default().sum(), 1.0, epsilon = 1e-5);
}

#[test]
fn normalized_blurs_fix_uniform_images() -> Result<(), FilterError> {
    let src = Image::<3>::from_size_val(
        ImageSize {
            width: 9,
            height: 9,
        },
        144,
    )?;
    for kernel in [kernels::box_blur(), kernels::gaussian_default()] {
        let dst = run(&src, &Convolution::new(kernel))?;
        for &v in dst.as_slice() {
            // truncation after the float sum may lose at most one step
            assert!(v == 144 || v == 143, "got {v}");
        }
    }

    Ok(())
}

#[test]
fn opening_and_closing_are_idempotent() -> Result<(), FilterError> {
    let src = noisy_image(9, 9);
    let element = StructuringElement::rect(3, 3);

    let opened = open(&src, &element, &mut NullProgress)?
        .into_image()
        .expect("not cancelled");
    let opened_twice = open(&opened, &element, &mut NullProgress)?
        .into_image()
        .expect("not cancelled");
    assert_eq!(opened, opened_twice);

    let closed = close(&src, &element, &mut NullProgress)?
        .into_image()
        .expect("not cancelled");
    let closed_twice = close(&closed, &element, &mut NullProgress)?
        .into_image()
        .expect("not cancelled");
    assert_eq!(closed, closed_twice);

    Ok(())
}

#[test]
fn median_preserves_constant_color() -> Result<(), FilterError> {
    let src = Image::<3>::from_size_val(
        ImageSize {
            width: 6,
            height: 6,
        },
        201,
    )?;
    let dst = run(&src, &Median::default())?;
    assert_eq!(dst, src);

    Ok(())
}

#[test]
fn autolevels_is_a_no_op_on_full_range_images() -> Result<(), FilterError> {
    // every channel spans 0..=255 somewhere
    let src = Image::<3>::new(
        ImageSize {
            width: 2,
            height: 2,
        },
        vec![
            0, 0, 0, 255, 255, 255, //
            17, 130, 201, 99, 42, 7,
        ],
    )?;
    let ranges = ChannelRanges::measure(&src)?;
    let dst = run(&src, &Autolevels::new(ranges)?)?;
    assert_eq!(dst, src);

    Ok(())
}

#[test]
fn pre_cancelled_run_yields_no_buffer() -> Result<(), FilterError> {
    let src = noisy_image(16, 16);
    let mut sink = Recorder::new(true);
    let outcome = apply(&src, &Invert, &mut sink)?;

    assert_eq!(outcome, FilterOutcome::Cancelled);
    // the report emitted before the first poll is the only one
    assert_eq!(sink.reports, vec![0]);

    Ok(())
}

#[test]
fn linear_stretch_matches_the_reference_vector() -> Result<(), FilterError> {
    let src = Image::<3>::new(
        ImageSize {
            width: 2,
            height: 2,
        },
        vec![
            10, 10, 10, 250, 250, 250, //
            10, 10, 10, 250, 250, 250,
        ],
    )?;
    let range = IntensityRange::measure(&src)?;
    assert_eq!(range, IntensityRange { min: 10, max: 250 });

    let dst = run(&src, &LinearStretch::new(range)?)?;
    assert_eq!(
        dst.as_slice(),
        &[
            0, 0, 0, 255, 255, 255, //
            0, 0, 0, 255, 255, 255,
        ]
    );

    Ok(())
}

#[test]
fn sobel_on_flat_image_is_all_white() -> Result<(), FilterError> {
    let src = Image::<3>::from_size_val(
        ImageSize {
            width: 5,
            height: 5,
        },
        66,
    )?;
    let dst = run(&src, &EdgeDecision::sobel())?;
    assert!(dst.as_slice().iter().all(|&v| v == 255));

    Ok(())
}

#[test]
fn grayscale_then_emboss_chains_through_fresh_buffers() -> Result<(), FilterError> {
    let src = noisy_image(10, 10);
    let gray = run(&src, &Grayscale)?;
    let embossed = run(&gray, &Emboss::new())?;

    assert_eq!(embossed.size(), src.size());
    // the source is untouched by either pass
    assert_eq!(src, noisy_image(10, 10));

    Ok(())
}

#[test]
fn progress_covers_the_scan_monotonically() -> Result<(), FilterError> {
    let src = noisy_image(50, 4);
    let mut sink = Recorder::new(false);
    let outcome = apply(&src, &Invert, &mut sink)?;

    assert!(!outcome.is_cancelled());
    assert_eq!(sink.reports.len(), 50);
    assert_eq!(sink.reports.first(), Some(&0));
    assert_eq!(sink.reports.last(), Some(&98));
    assert!(sink.reports.windows(2).all(|w| w[0] <= w[1]));

    Ok(())
}

#[test]
fn alpha_survives_every_filter_family() -> Result<(), FilterError> {
    let mut data = Vec::new();
    for i in 0..16u8 {
        data.extend_from_slice(&[i * 3, i * 5, i * 7, 100 + i]);
    }
    let src = Image::<4>::new(
        ImageSize {
            width: 4,
            height: 4,
        },
        data,
    )?;

    let results = vec![
        run(&src, &Invert)?,
        run(&src, &Grayscale)?,
        run(&src, &Convolution::new(kernels::box_blur()))?,
        run(&src, &Median::default())?,
        run(&src, &EdgeDecision::sobel())?,
    ];

    for dst in &results {
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(dst.get_pixel(x, y)?[3], src.get_pixel(x, y)?[3]);
            }
        }
    }

    Ok(())
}
