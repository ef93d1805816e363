//! Bootstrap orchestrators: the classical programmable bootstrap, two-pass
//! classical FDFB, and the recursive full-domain variant built on the
//! decomposed negacyclic tables.

use crate::algorithms::glwe_sample_extraction::extract_lwe_sample_from_glwe_ciphertext;
use crate::algorithms::lookup_table_generation::generate_lookup_table_assign;
use crate::algorithms::slice_algorithms::slice_wrapping_add_assign;
use crate::commons::parameters::{BootstrapOrder, MonomialDegree};
use crate::commons::torus::UnsignedTorus;
use crate::commons::traits::{Container, ContainerMut};
use crate::entities::lookup_table::LookupTable;
use crate::entities::lwe_ciphertext::{LweCiphertext, LweCiphertextOwned};
use crate::evaluator::blind_rotate::ModSwitchKind;
use crate::evaluator::{keyswitch_assign, Evaluator};

impl<Scalar: UnsignedTorus> Evaluator<Scalar> {
    /// Bootstrap `ct` through the function `f`, refreshing its noise while
    /// evaluating `f` on its message. Correct on the lower half of the
    /// message domain; see [`Evaluator::fdfb_lut_assign`] and
    /// [`Evaluator::bootstrap_extended_full_domain_assign`] for full-domain
    /// evaluation.
    pub fn bootstrap_func<InputCont, F>(
        &mut self,
        ct: &LweCiphertext<InputCont>,
        f: F,
    ) -> LweCiphertextOwned<Scalar>
    where
        InputCont: Container<Element = Scalar>,
        F: Fn(u64) -> u64,
    {
        let mut lut = LookupTable::new(&self.parameters);
        generate_lookup_table_assign(&self.parameters, f, &mut lut);
        self.bootstrap_lut(ct, &lut)
    }

    /// Bootstrap `ct` through a prepared lookup table.
    pub fn bootstrap_lut<InputCont>(
        &mut self,
        ct: &LweCiphertext<InputCont>,
        lut: &LookupTable<Scalar>,
    ) -> LweCiphertextOwned<Scalar>
    where
        InputCont: Container<Element = Scalar>,
    {
        let mut ct_out =
            LweCiphertextOwned::new(self.parameters.default_lwe_dimension().to_lwe_size());
        self.bootstrap_lut_assign(ct, lut, &mut ct_out);
        ct_out
    }

    /// Bootstrap `ct` through a prepared lookup table, writing to `ct_out`.
    pub fn bootstrap_lut_assign<InputCont, OutputCont>(
        &mut self,
        ct: &LweCiphertext<InputCont>,
        lut: &LookupTable<Scalar>,
        ct_out: &mut LweCiphertext<OutputCont>,
    ) where
        InputCont: Container<Element = Scalar>,
        OutputCont: ContainerMut<Element = Scalar>,
    {
        self.bootstrap_lut_kind_assign(ct, lut, ModSwitchKind::Original, ct_out);
    }

    /// Bootstrap with a caller-supplied modulus-switch constant, as used
    /// between the stages of the recursive hierarchy evaluation.
    pub fn bootstrap_lut_with_constant_assign<InputCont, OutputCont>(
        &mut self,
        ct: &LweCiphertext<InputCont>,
        lut: &LookupTable<Scalar>,
        ms_constant: f64,
        ct_out: &mut LweCiphertext<OutputCont>,
    ) where
        InputCont: Container<Element = Scalar>,
        OutputCont: ContainerMut<Element = Scalar>,
    {
        self.bootstrap_lut_kind_assign(
            ct,
            lut,
            ModSwitchKind::WithConstant(ms_constant),
            ct_out,
        );
    }

    /// Allocating variant of [`Evaluator::bootstrap_lut_with_constant_assign`].
    pub fn bootstrap_lut_with_constant<InputCont>(
        &mut self,
        ct: &LweCiphertext<InputCont>,
        lut: &LookupTable<Scalar>,
        ms_constant: f64,
    ) -> LweCiphertextOwned<Scalar>
    where
        InputCont: Container<Element = Scalar>,
    {
        let mut ct_out =
            LweCiphertextOwned::new(self.parameters.default_lwe_dimension().to_lwe_size());
        self.bootstrap_lut_with_constant_assign(ct, lut, ms_constant, &mut ct_out);
        ct_out
    }

    fn bootstrap_lut_kind_assign<InputCont, OutputCont>(
        &mut self,
        ct: &LweCiphertext<InputCont>,
        lut: &LookupTable<Scalar>,
        kind: ModSwitchKind,
        ct_out: &mut LweCiphertext<OutputCont>,
    ) where
        InputCont: Container<Element = Scalar>,
        OutputCont: ContainerMut<Element = Scalar>,
    {
        let extend_factor = self.parameters.extend_factor().0;
        match self.parameters.bootstrap_order() {
            BootstrapOrder::KeySwitchBlindRotate => {
                self.keyswitch_into_buffer(ct.as_ref());
                self.fill_switched_from_keyswitch_buffer(kind, extend_factor);
                self.blind_rotate_kernel(lut, extend_factor);
                extract_lwe_sample_from_glwe_ciphertext(
                    &self.buffers.ct_acc[0],
                    ct_out,
                    MonomialDegree(0),
                );
            }
            BootstrapOrder::BlindRotateKeySwitch => {
                self.fill_switched(ct.as_ref(), kind, extend_factor);
                self.blind_rotate_kernel(lut, extend_factor);
                extract_lwe_sample_from_glwe_ciphertext(
                    &self.buffers.ct_acc[0],
                    &mut self.buffers.ct_extract,
                    MonomialDegree(0),
                );
                keyswitch_assign(
                    &self.keyswitch_key,
                    &self.keyswitch_decomposer,
                    &mut self.buffers.scalar_decomposed,
                    self.buffers.ct_extract.as_ref(),
                    ct_out.as_mut(),
                );
            }
        }
    }

    /// Two-pass classical FDFB: a first bootstrap through the compression
    /// table isolates the half-domain indicator, the second evaluates `f`
    /// through the full-domain table.
    pub fn fdfb_lut_assign<InputCont, OutputCont>(
        &mut self,
        ct: &LweCiphertext<InputCont>,
        compress_lut: &LookupTable<Scalar>,
        fdfb_lut: &LookupTable<Scalar>,
        ct_out: &mut LweCiphertext<OutputCont>,
    ) where
        InputCont: Container<Element = Scalar>,
        OutputCont: ContainerMut<Element = Scalar>,
    {
        self.bootstrap_lut_assign(ct, compress_lut, ct_out);
        let intermediate = LweCiphertextOwned::from_container(ct_out.as_ref().to_vec());
        self.bootstrap_lut_assign(&intermediate, fdfb_lut, ct_out);
    }

    /// Allocating variant of [`Evaluator::fdfb_lut_assign`].
    pub fn fdfb_lut<InputCont>(
        &mut self,
        ct: &LweCiphertext<InputCont>,
        compress_lut: &LookupTable<Scalar>,
        fdfb_lut: &LookupTable<Scalar>,
    ) -> LweCiphertextOwned<Scalar>
    where
        InputCont: Container<Element = Scalar>,
    {
        let mut ct_out =
            LweCiphertextOwned::new(self.parameters.default_lwe_dimension().to_lwe_size());
        self.fdfb_lut_assign(ct, compress_lut, fdfb_lut, &mut ct_out);
        ct_out
    }

    /// Recursive full-domain bootstrap over the decomposed negacyclic
    /// tables: the telescope of shrinking blind rotations is summed in the
    /// GLWE accumulator, the base table is resolved through the compression
    /// pass, and coefficient 0 of the sum is extracted.
    pub fn bootstrap_extended_full_domain_assign<InputCont, OutputCont>(
        &mut self,
        ct: &LweCiphertext<InputCont>,
        compress_lut: &LookupTable<Scalar>,
        decomposed_lut: &[LookupTable<Scalar>],
        ct_out: &mut LweCiphertext<OutputCont>,
    ) where
        InputCont: Container<Element = Scalar>,
        OutputCont: ContainerMut<Element = Scalar>,
    {
        assert_eq!(
            self.parameters.bootstrap_order(),
            BootstrapOrder::KeySwitchBlindRotate,
            "The recursive full-domain bootstrap requires the KeySwitchBlindRotate order"
        );
        let extend_factor = self.parameters.extend_factor().0;
        assert!(
            extend_factor >= 2,
            "The recursive full-domain bootstrap requires an extended lookup table"
        );
        assert!(decomposed_lut.len() >= 2);

        self.keyswitch_into_buffer(ct.as_ref());

        // negacyclic telescope, accumulated in ct_rotate
        self.fill_switched_from_keyswitch_buffer(ModSwitchKind::Recursive, extend_factor / 2);
        self.blind_rotate_kernel(&decomposed_lut[0], extend_factor / 2);
        self.buffers
            .ct_rotate
            .as_mut()
            .copy_from_slice(self.buffers.ct_acc[0].as_ref());

        for (index, lut) in decomposed_lut[1..decomposed_lut.len() - 1].iter().enumerate() {
            let stage_extend_factor = extend_factor >> (index + 2);
            self.fill_switched_from_keyswitch_buffer(
                ModSwitchKind::Recursive,
                stage_extend_factor,
            );
            self.blind_rotate_kernel(lut, stage_extend_factor);
            slice_wrapping_add_assign(
                self.buffers.ct_rotate.as_mut(),
                self.buffers.ct_acc[0].as_ref(),
            );
        }

        // base stage: compression bootstrap, then the base table
        self.fill_switched_from_keyswitch_buffer(ModSwitchKind::Compress, 1);
        self.blind_rotate_kernel(compress_lut, 1);
        extract_lwe_sample_from_glwe_ciphertext(
            &self.buffers.ct_acc[0],
            &mut self.buffers.ct_extract,
            MonomialDegree(0),
        );
        keyswitch_assign(
            &self.keyswitch_key,
            &self.keyswitch_decomposer,
            &mut self.buffers.scalar_decomposed,
            self.buffers.ct_extract.as_ref(),
            self.buffers.ct_keyswitch.as_mut(),
        );

        self.fill_switched_from_keyswitch_buffer(ModSwitchKind::Base, 1);
        self.blind_rotate_kernel(&decomposed_lut[decomposed_lut.len() - 1], 1);
        slice_wrapping_add_assign(
            self.buffers.ct_rotate.as_mut(),
            self.buffers.ct_acc[0].as_ref(),
        );

        extract_lwe_sample_from_glwe_ciphertext(&self.buffers.ct_rotate, ct_out, MonomialDegree(0));
    }

    /// Allocating variant of
    /// [`Evaluator::bootstrap_extended_full_domain_assign`].
    pub fn bootstrap_extended_full_domain<InputCont>(
        &mut self,
        ct: &LweCiphertext<InputCont>,
        compress_lut: &LookupTable<Scalar>,
        decomposed_lut: &[LookupTable<Scalar>],
    ) -> LweCiphertextOwned<Scalar>
    where
        InputCont: Container<Element = Scalar>,
    {
        let mut ct_out =
            LweCiphertextOwned::new(self.parameters.default_lwe_dimension().to_lwe_size());
        self.bootstrap_extended_full_domain_assign(ct, compress_lut, decomposed_lut, &mut ct_out);
        ct_out
    }

    fn keyswitch_into_buffer(&mut self, ct: &[Scalar]) {
        keyswitch_assign(
            &self.keyswitch_key,
            &self.keyswitch_decomposer,
            &mut self.buffers.scalar_decomposed,
            ct,
            self.buffers.ct_keyswitch.as_mut(),
        );
    }

    fn fill_switched_from_keyswitch_buffer(&mut self, kind: ModSwitchKind, extend_factor: usize) {
        let (constant, double_after_rounding) =
            kind.profile(self.mod_switch_constant(), self.parameters.extend_factor().0);
        let target = 2 * self.parameters.polynomial_size().0 * extend_factor;
        crate::evaluator::blind_rotate::fill_switched_slice(
            &mut self.buffers.switched,
            self.buffers.ct_keyswitch.as_ref(),
            constant,
            double_after_rounding,
            target,
        );
    }
}
