//! Per-run ridge test and run emission.
//!
//! For each interior pixel of a run the gradient direction selects, per
//! side of the pixel, two stencil neighbours that bracket the continuous
//! gradient direction. The magnitude one pixel away along that direction is
//! linearly interpolated from them; the pixel is a ridge point when the
//! magnitude falls off on both sides.
use super::direction::DirectionCode;
use super::neighborhood::Window;
use super::sample::GradientSample;
use crate::error::NmsError;
use crate::region::{RegionBuilder, Run};

#[derive(Clone, Copy)]
enum Term {
    Centre,
    G0,
    G1,
}

/// `(row offset, column offset)` of a stencil neighbour.
type Offset = (i8, i8);

struct OctantStencil {
    /// Pair whose difference multiplies `dx`.
    x_term: (Term, Term),
    /// Pair whose difference multiplies `dy`.
    y_term: (Term, Term),
    /// `(g0, g1)` neighbour positions on the near and far side.
    sides: [(Offset, Offset); 2],
}

const fn stencil(
    x_term: (Term, Term),
    y_term: (Term, Term),
    sides: [(Offset, Offset); 2],
) -> OctantStencil {
    OctantStencil {
        x_term,
        y_term,
        sides,
    }
}

use Term::{Centre as M, G0, G1};

/// Indexed by direction code.
const STENCILS: [OctantStencil; 8] = [
    stencil((M, G0), (G0, G1), [((0, -1), (1, -1)), ((0, 1), (-1, 1))]),
    stencil((G0, G1), (M, G0), [((1, 0), (1, -1)), ((-1, 0), (-1, 1))]),
    stencil((G1, G0), (M, G0), [((1, 0), (1, 1)), ((-1, 0), (-1, -1))]),
    stencil((G0, M), (G0, G1), [((0, 1), (1, 1)), ((0, -1), (-1, -1))]),
    stencil((G0, M), (G1, G0), [((0, 1), (-1, 1)), ((0, -1), (1, -1))]),
    stencil((G1, G0), (G0, M), [((-1, 0), (-1, 1)), ((1, 0), (1, -1))]),
    stencil((G0, G1), (G0, M), [((-1, 0), (-1, -1)), ((1, 0), (1, 1))]),
    stencil((M, G0), (G1, G0), [((0, -1), (-1, -1)), ((0, 1), (1, 1))]),
];

#[inline]
fn pick<T: Copy>(term: Term, gm: T, g0: T, g1: T) -> T {
    match term {
        Term::Centre => gm,
        Term::G0 => g0,
        Term::G1 => g1,
    }
}

/// Direction code of buffer column `x` if it is a ridge point.
#[inline]
pub fn ridge_direction<T: GradientSample>(
    window: &Window<'_, T>,
    x: usize,
    threshold: T,
) -> Option<DirectionCode> {
    let gm = window.at(x, 0, 0);
    if !gm.is_candidate(threshold) {
        return None;
    }
    let gx = window.grad_x[x];
    let gy = window.grad_y[x];
    let code = DirectionCode::quantize(gy, gx);
    let st = &STENCILS[code.value() as usize];
    let rising = st.sides.iter().all(|&((r0, c0), (r1, c1))| {
        let g0 = window.at(x, r0, c0);
        let g1 = window.at(x, r1, c1);
        let xt = (pick(st.x_term.0, gm, g0, g1), pick(st.x_term.1, gm, g0, g1));
        let yt = (pick(st.y_term.0, gm, g0, g1), pick(st.y_term.1, gm, g0, g1));
        T::rises(gm, xt, yt, gx, gy)
    });
    rising.then_some(code)
}

/// Scan one driver run of `window.row`, writing a direction byte per column
/// into `codes` and appending every maximal span of ridge points to
/// `builder`. The first and last column of the run are never ridge points.
///
/// Returns the number of retained pixels.
pub fn scan_run<T: GradientSample>(
    window: &Window<'_, T>,
    run: Run,
    threshold: T,
    codes: &mut [u8],
    builder: &mut RegionBuilder,
) -> Result<usize, NmsError> {
    debug_assert_eq!(codes.len(), run.len as usize);
    codes.fill(0);
    let len = run.len as usize;
    if len < 3 {
        return Ok(0);
    }
    let row = window.row;
    let base = (run.start - window.origin_col) as usize;
    let mut open: Option<i32> = None;
    let mut retained = 0;
    for i in 1..len - 1 {
        let col = run.start + i as i32;
        match ridge_direction(window, base + i, threshold) {
            Some(code) => {
                codes[i] = code.tagged();
                retained += 1;
                open.get_or_insert(col);
            }
            None => {
                if let Some(start) = open.take() {
                    builder.append(row, start, (col - start) as u32)?;
                }
            }
        }
    }
    if let Some(start) = open {
        let end = run.end() - 1;
        builder.append(row, start, (end - start + 1) as u32)?;
    }
    Ok(retained)
}

#[cfg(test)]
mod tests {
    use super::super::neighborhood::Neighborhood;
    use super::*;
    use crate::region::IntervalDomain;

    /// Ring holding a 3-row patch at rows 0..3 with per-pixel derivatives for row 1.
    fn ring_with(mag: [[i32; 5]; 3], gy: i32, gx: i32) -> Neighborhood<i32> {
        let mut ring = Neighborhood::new(0, 5).unwrap();
        for (r, values) in mag.iter().enumerate() {
            ring.advance_to(r as i32);
            ring.magnitude_span_mut(r as i32, 0, 5).copy_from_slice(values);
        }
        ring.begin_derivatives(1);
        ring.grad_y_span_mut(0, 5).fill(gy);
        ring.grad_x_span_mut(0, 5).fill(gx);
        ring
    }

    #[test]
    fn isolated_peak_with_horizontal_gradient() {
        let ring = ring_with(
            [[10, 10, 10, 10, 10], [10, 10, 50, 10, 10], [10, 10, 10, 10, 10]],
            0,
            1,
        );
        let w = ring.window(1);
        assert_eq!(ridge_direction(&w, 2, 5).map(|c| c.value()), Some(0));
        assert_eq!(ridge_direction(&w, 2, 60), None);
        assert_eq!(ridge_direction(&w, 1, 5), None);
        assert_eq!(ridge_direction(&w, 3, 5), None);
    }

    #[test]
    fn each_octant_keeps_a_peak() {
        for code in 0..8u8 {
            let [dx, dy] = DirectionCode::new(code).unwrap().unit_vector();
            let (gx, gy) = ((dx * 64.0).round() as i32, (dy * 64.0).round() as i32);
            let ring = ring_with(
                [[1, 1, 1, 1, 1], [1, 1, 9, 1, 1], [1, 1, 1, 1, 1]],
                gy,
                gx,
            );
            let w = ring.window(1);
            assert_eq!(
                ridge_direction(&w, 2, 0).map(|c| c.value()),
                Some(code),
                "octant {code}"
            );
        }
    }

    #[test]
    fn scan_run_emits_one_span_and_rejects_ends() {
        let ring = ring_with(
            [[10, 10, 10, 10, 10], [50, 50, 50, 50, 50], [10, 10, 10, 10, 10]],
            1,
            0,
        );
        let w = ring.window(1);
        let shell = IntervalDomain::rect(0, 0, 3, 5);
        let mut builder = RegionBuilder::for_domain(&shell).unwrap();
        let mut codes = [0xffu8; 5];
        let kept = scan_run(&w, Run::new(0, 5), 0, &mut codes, &mut builder).unwrap();
        assert_eq!(kept, 3);
        assert_eq!(codes, [0, 134, 134, 134, 0]);
        let domain = builder.finish().unwrap();
        assert_eq!(domain.row_runs(1), &[Run::new(1, 3)]);
    }

    #[test]
    fn short_runs_have_no_interior() {
        let ring = ring_with([[0; 5], [9; 5], [0; 5]], 1, 0);
        let w = ring.window(1);
        let shell = IntervalDomain::rect(0, 0, 3, 5);
        let mut builder = RegionBuilder::for_domain(&shell).unwrap();
        let mut codes = [7u8; 2];
        assert_eq!(scan_run(&w, Run::new(1, 2), 0, &mut codes, &mut builder).unwrap(), 0);
        assert_eq!(codes, [0, 0]);
        assert_eq!(builder.run_count(), 0);
    }
}
