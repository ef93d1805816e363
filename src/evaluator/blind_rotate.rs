//! The blind-rotation kernel.
//!
//! One kernel covers every variant. A lookup table of `e'` interleaved
//! polynomials is rotated by the mod-switched phase of the input ciphertext:
//! the rotation index splits as `index = mono * e' + idx`, where `mono`
//! rotates each polynomial slot and `idx` shuffles slots across the ring
//! boundary. The non-extended variants are the `e' = 1` specialization,
//! where every shuffle degenerates to slot 0.
//!
//! The accumulator is gadget-decomposed once per block of the block-binary
//! key and the decomposition is reused by every CMUX of the block: the block
//! leader takes a gadget product against the body rows of its GGSW, the
//! followers take full external products. Iteration order is part of the
//! contract: the Fourier-domain products do not associate in f64, so blocks
//! run in increasing order and coordinates in increasing order inside each
//! block.

use crate::algorithms::polynomial_algorithms::polynomial_wrapping_monic_monomial_mul;
use crate::commons::numeric::UnsignedInteger;
use crate::commons::parameters::MonomialDegree;
use crate::commons::torus::UnsignedTorus;
use crate::commons::traits::{Container, ContainerMut};
use crate::entities::glwe_ciphertext::GlweCiphertext;
use crate::entities::lookup_table::LookupTable;
use crate::entities::lwe_ciphertext::LweCiphertext;
use crate::evaluator::{mod_switch_round, Evaluator};
use crate::fft::product::{
    external_product_fourier_decomposed, fourier_glwe_polynomial_mul,
    fourier_glwe_polynomial_mul_add, fourier_glwe_sub_assign, gadget_product_fourier_decomposed,
};

/// Which mod-switch discretisation feeds the kernel.
#[derive(Clone, Copy, Debug)]
pub(crate) enum ModSwitchKind {
    /// Classical double-angle rounding over the full table.
    Original,
    /// Recursive-variant rounding at a caller-chosen target size.
    Recursive,
    /// Compression-table rounding: round at table precision, then double.
    Compress,
    /// Base-table rounding at the ring degree.
    Base,
    /// Caller-supplied constant.
    WithConstant(f64),
}

impl ModSwitchKind {
    /// Resolve the discretisation constant and whether the rounded value is
    /// doubled afterwards.
    pub(crate) fn profile(self, base_constant: f64, params_extend_factor: usize) -> (f64, bool) {
        match self {
            ModSwitchKind::Original => (2.0 * base_constant, false),
            ModSwitchKind::Recursive => (base_constant, false),
            ModSwitchKind::Compress => (base_constant, true),
            ModSwitchKind::Base => (2.0 * base_constant / params_extend_factor as f64, false),
            ModSwitchKind::WithConstant(constant) => (constant, false),
        }
    }
}

/// Discretise a ciphertext into rotation exponents: entry 0 holds the
/// body's exponent `2T - switch(body)` in `[1, 2T]`, entry `i + 1` the one
/// of mask element `i`.
pub(crate) fn fill_switched_slice<Scalar: UnsignedTorus>(
    switched: &mut [usize],
    ct: &[Scalar],
    constant: f64,
    double_after_rounding: bool,
    target: usize,
) {
    assert_eq!(
        ct.len(),
        switched.len(),
        "Blind rotation expects a ciphertext under the LWE key"
    );
    let (mask, body) = ct.split_at(ct.len() - 1);
    switched[0] = target - mod_switch_round(body[0], constant, double_after_rounding) % target;
    for (switched, &mask_element) in switched[1..].iter_mut().zip(mask) {
        *switched =
            target - mod_switch_round(mask_element, constant, double_after_rounding) % target;
    }
}

impl<Scalar: UnsignedTorus> Evaluator<Scalar> {
    /// Blind-rotate `lut` by `ct` and write the resulting GLWE accumulator
    /// to `ct_out`. The input must be under the LWE key.
    pub fn blind_rotate_assign<InputCont, OutputCont>(
        &mut self,
        ct: &LweCiphertext<InputCont>,
        lut: &LookupTable<Scalar>,
        ct_out: &mut GlweCiphertext<OutputCont>,
    ) where
        InputCont: Container<Element = Scalar>,
        OutputCont: ContainerMut<Element = Scalar>,
    {
        let extend_factor = self.parameters.extend_factor().0;
        self.fill_switched(ct.as_ref(), ModSwitchKind::Original, extend_factor);
        self.blind_rotate_kernel(lut, extend_factor);
        ct_out
            .as_mut()
            .copy_from_slice(self.buffers.ct_acc[0].as_ref());
    }

    /// Blind-rotate a decomposed negacyclic table of the given extend
    /// factor, with the recursive-variant discretisation.
    pub fn blind_rotate_arbitrary_extended_assign<InputCont, OutputCont>(
        &mut self,
        ct: &LweCiphertext<InputCont>,
        lut: &LookupTable<Scalar>,
        extend_factor: usize,
        ct_out: &mut GlweCiphertext<OutputCont>,
    ) where
        InputCont: Container<Element = Scalar>,
        OutputCont: ContainerMut<Element = Scalar>,
    {
        self.fill_switched(ct.as_ref(), ModSwitchKind::Recursive, extend_factor);
        self.blind_rotate_kernel(lut, extend_factor);
        ct_out
            .as_mut()
            .copy_from_slice(self.buffers.ct_acc[0].as_ref());
    }

    /// Discretise the phase of `ct` into `buffers.switched`.
    pub(crate) fn fill_switched(
        &mut self,
        ct: &[Scalar],
        kind: ModSwitchKind,
        extend_factor: usize,
    ) {
        let (constant, double_after_rounding) =
            kind.profile(self.mod_switch_constant(), self.parameters.extend_factor().0);
        let target = 2 * self.parameters.polynomial_size().0 * extend_factor;
        fill_switched_slice(
            &mut self.buffers.switched,
            ct,
            constant,
            double_after_rounding,
            target,
        );
    }

    /// Run the CMUX accumulation over `buffers.switched`, leaving the result
    /// in `buffers.ct_acc[0]`.
    pub(crate) fn blind_rotate_kernel(&mut self, lut: &LookupTable<Scalar>, extend_factor: usize) {
        let glwe_size = self.parameters.glwe_size().0;
        let block_size = self.parameters.block_size().0;
        let block_count = self.parameters.block_count().0;
        let lwe_dimension = self.parameters.lwe_dimension().0;
        let body_index = glwe_size - 1;

        assert_eq!(lut.extend_factor().0, extend_factor);
        assert_eq!(lut.polynomial_size(), self.parameters.polynomial_size());
        assert!(block_count >= 2, "Blind rotation needs at least two blocks");

        // initial rotation of the table by the body exponent, with the
        // cross-slot shuffle
        let b2n = self.buffers.switched[0];
        let (b2n_mono, b2n_idx) = (b2n / extend_factor, b2n % extend_factor);
        for slot in 0..b2n_idx {
            let mut body = self.buffers.ct_acc[extend_factor - b2n_idx + slot].get_mut_body();
            polynomial_wrapping_monic_monomial_mul(
                &mut body,
                &lut.get_polynomial(slot),
                MonomialDegree(b2n_mono + 1),
            );
        }
        for slot in b2n_idx..extend_factor {
            let mut body = self.buffers.ct_acc[slot - b2n_idx].get_mut_body();
            polynomial_wrapping_monic_monomial_mul(
                &mut body,
                &lut.get_polynomial(slot),
                MonomialDegree(b2n_mono),
            );
        }
        for ring in 0..extend_factor {
            let (mask, _) = self.buffers.ct_acc[ring].get_mut_mask_and_body();
            mask.fill(Scalar::ZERO);
        }

        // first block: the accumulator is trivial, only the body digits
        // matter
        for ring in 0..extend_factor {
            self.decompose_accumulator_polynomial(ring, body_index);
        }
        for coordinate in 0..block_size {
            let a2n = self.buffers.switched[coordinate + 1];
            for ring in 0..extend_factor {
                gadget_product_fourier_decomposed(
                    self.blind_rotate_key.get_ggsw(coordinate),
                    &self.buffers.ct_acc_fourier_decomposed[ring][body_index],
                    &mut self.buffers.ct_block_fourier_acc[ring],
                );
            }
            self.apply_monomial_mask(a2n, extend_factor, coordinate != 0);
        }
        self.flush_fourier_accumulator(extend_factor);

        // middle blocks: full re-decomposition, external products
        for block in 1..block_count - 1 {
            for ring in 0..extend_factor {
                for polynomial in 0..glwe_size {
                    self.decompose_accumulator_polynomial(ring, polynomial);
                }
            }
            for coordinate in block * block_size..(block + 1) * block_size {
                let a2n = self.buffers.switched[coordinate + 1];
                for ring in 0..extend_factor {
                    external_product_fourier_decomposed(
                        self.blind_rotate_key.get_ggsw(coordinate),
                        &self.buffers.ct_acc_fourier_decomposed[ring],
                        &mut self.buffers.ct_block_fourier_acc[ring],
                    );
                }
                self.apply_monomial_mask(a2n, extend_factor, coordinate != block * block_size);
            }
            self.flush_fourier_accumulator(extend_factor);
        }

        // last block: the shuffle always lands in slot 0, so only that slot
        // is computed
        for ring in 0..extend_factor {
            for polynomial in 0..glwe_size {
                self.decompose_accumulator_polynomial(ring, polynomial);
            }
        }
        for coordinate in lwe_dimension - block_size..lwe_dimension {
            let a2n = self.buffers.switched[coordinate + 1];
            let (a2n_mono, a2n_idx) = (a2n / extend_factor, a2n % extend_factor);
            let accumulate = coordinate != lwe_dimension - block_size;

            if a2n_idx == 0 {
                external_product_fourier_decomposed(
                    self.blind_rotate_key.get_ggsw(coordinate),
                    &self.buffers.ct_acc_fourier_decomposed[0],
                    &mut self.buffers.ct_block_fourier_acc[0],
                );
                self.monomial_sub_one_to_fourier(a2n_mono);
                if accumulate {
                    fourier_glwe_polynomial_mul_add(
                        &self.buffers.ct_block_fourier_acc[0],
                        &self.buffers.f_mono,
                        &mut self.buffers.ct_fourier_acc[0],
                    );
                } else {
                    fourier_glwe_polynomial_mul(
                        &self.buffers.ct_block_fourier_acc[0],
                        &self.buffers.f_mono,
                        &mut self.buffers.ct_fourier_acc[0],
                    );
                }
            } else {
                let wrapped = extend_factor - a2n_idx;
                external_product_fourier_decomposed(
                    self.blind_rotate_key.get_ggsw(coordinate),
                    &self.buffers.ct_acc_fourier_decomposed[0],
                    &mut self.buffers.ct_block_fourier_acc[0],
                );
                external_product_fourier_decomposed(
                    self.blind_rotate_key.get_ggsw(coordinate),
                    &self.buffers.ct_acc_fourier_decomposed[wrapped],
                    &mut self.buffers.ct_block_fourier_acc[wrapped],
                );
                self.monomial_to_fourier(a2n_mono + 1);
                if accumulate {
                    fourier_glwe_polynomial_mul_add(
                        &self.buffers.ct_block_fourier_acc[wrapped],
                        &self.buffers.f_mono,
                        &mut self.buffers.ct_fourier_acc[0],
                    );
                } else {
                    fourier_glwe_polynomial_mul(
                        &self.buffers.ct_block_fourier_acc[wrapped],
                        &self.buffers.f_mono,
                        &mut self.buffers.ct_fourier_acc[0],
                    );
                }
                fourier_glwe_sub_assign(
                    &mut self.buffers.ct_fourier_acc[0],
                    &self.buffers.ct_block_fourier_acc[0],
                );
            }
        }
        self.flush_fourier_accumulator(1);
    }

    /// Decompose polynomial `polynomial` of accumulator slot `ring` and push
    /// the digits to the Fourier domain.
    fn decompose_accumulator_polynomial(&mut self, ring: usize, polynomial: usize) {
        let level_count = self.parameters.blind_rotate_parameters().level().0;
        let source = self.buffers.ct_acc[ring].get_polynomial(polynomial);
        self.blind_rotate_decomposer.decompose_polynomial_assign(
            &source,
            &mut self.buffers.poly_decomposed[..level_count],
        );
        for level in 0..level_count {
            let stack = self.buffers.computation_buffers.stack();
            self.fft.as_view().forward_as_integer(
                &mut self.buffers.ct_acc_fourier_decomposed[ring][polynomial][level],
                &self.buffers.poly_decomposed[level],
                stack,
            );
        }
    }

    /// Multiply the CMUX products by `(X^a - 1)` and fold them into the
    /// running Fourier accumulator, with the cross-slot shuffle of the
    /// extended representation.
    fn apply_monomial_mask(&mut self, a2n: usize, extend_factor: usize, accumulate: bool) {
        let (a2n_mono, a2n_idx) = (a2n / extend_factor, a2n % extend_factor);

        if a2n_idx == 0 {
            self.monomial_sub_one_to_fourier(a2n_mono);
            for ring in 0..extend_factor {
                if accumulate {
                    fourier_glwe_polynomial_mul_add(
                        &self.buffers.ct_block_fourier_acc[ring],
                        &self.buffers.f_mono,
                        &mut self.buffers.ct_fourier_acc[ring],
                    );
                } else {
                    fourier_glwe_polynomial_mul(
                        &self.buffers.ct_block_fourier_acc[ring],
                        &self.buffers.f_mono,
                        &mut self.buffers.ct_fourier_acc[ring],
                    );
                }
            }
        } else {
            self.monomial_to_fourier(a2n_mono + 1);
            for ring in 0..a2n_idx {
                self.masked_shuffle_into(ring, extend_factor - a2n_idx + ring, accumulate);
            }
            self.monomial_to_fourier(a2n_mono);
            for ring in a2n_idx..extend_factor {
                self.masked_shuffle_into(ring, ring - a2n_idx, accumulate);
            }
        }
    }

    // fourier_acc[ring] (+)= block_acc[source] * f_mono; fourier_acc[ring] -= block_acc[ring]
    fn masked_shuffle_into(&mut self, ring: usize, source: usize, accumulate: bool) {
        if accumulate {
            fourier_glwe_polynomial_mul_add(
                &self.buffers.ct_block_fourier_acc[source],
                &self.buffers.f_mono,
                &mut self.buffers.ct_fourier_acc[ring],
            );
        } else {
            fourier_glwe_polynomial_mul(
                &self.buffers.ct_block_fourier_acc[source],
                &self.buffers.f_mono,
                &mut self.buffers.ct_fourier_acc[ring],
            );
        }
        fourier_glwe_sub_assign(
            &mut self.buffers.ct_fourier_acc[ring],
            &self.buffers.ct_block_fourier_acc[ring],
        );
    }

    /// Inverse-transform the Fourier accumulator and add it to the
    /// standard-domain accumulator, for the first `rings` slots.
    fn flush_fourier_accumulator(&mut self, rings: usize) {
        let glwe_size = self.parameters.glwe_size().0;
        for ring in 0..rings {
            for polynomial in 0..glwe_size {
                let stack = self.buffers.computation_buffers.stack();
                let mut target = self.buffers.ct_acc[ring].get_mut_polynomial(polynomial);
                self.fft.as_view().add_backward_as_torus(
                    &mut target,
                    &self.buffers.ct_fourier_acc[ring].get_polynomial(polynomial),
                    stack,
                );
            }
        }
    }

    /// Build the Fourier image of `X^degree`.
    pub(crate) fn monomial_to_fourier(&mut self, degree: usize) {
        self.stage_monomial(degree, false);
    }

    /// Build the Fourier image of `X^degree - 1`.
    pub(crate) fn monomial_sub_one_to_fourier(&mut self, degree: usize) {
        self.stage_monomial(degree, true);
    }

    fn stage_monomial(&mut self, degree: usize, sub_one: bool) {
        let polynomial_size = self.parameters.polynomial_size().0;
        let degree = degree % (2 * polynomial_size);

        self.buffers.mono_poly.fill_with_zero();
        let coefficients = self.buffers.mono_poly.as_mut();
        if degree < polynomial_size {
            coefficients[degree] = Scalar::ONE;
        } else {
            coefficients[degree - polynomial_size] = Scalar::ZERO.wrapping_sub(Scalar::ONE);
        }
        if sub_one {
            coefficients[0] = coefficients[0].wrapping_sub(Scalar::ONE);
        }

        let stack = self.buffers.computation_buffers.stack();
        self.fft.as_view().forward_as_integer(
            &mut self.buffers.f_mono,
            &self.buffers.mono_poly,
            stack,
        );
    }
}
