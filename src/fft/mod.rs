//! Negacyclic FFT over the reals, used for the ring products of blind
//! rotation and GLWE encryption.
//!
//! Polynomials of size `N` are folded into `N/2` complex coefficients and
//! twisted by `2N`-th roots of unity before a size-`N/2` complex FFT, as in
//! [Fast and Error-Free Negacyclic Integer Convolution using Extended Fourier
//! Transform](https://eprint.iacr.org/2021/480).

use crate::commons::parameters::{FourierPolynomialSize, PolynomialSize};
use crate::commons::numeric::{CastInto, UnsignedInteger};
use crate::commons::torus::UnsignedTorus;
use crate::commons::traits::{Container, ContainerMut};
use crate::entities::polynomial::Polynomial;
use aligned_vec::{avec, ABox, CACHELINE_ALIGN};
use dyn_stack::{PodStack, StackReq};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};
use std::time::Duration;
use tfhe_fft::c64;
use tfhe_fft::unordered::{Method, Plan};

pub mod product;

/// Twisting factors: the first `N/2` of the `2N`-th roots of unity.
#[derive(Clone, Debug, PartialEq)]
pub struct Twisties {
    re: ABox<[f64]>,
    im: ABox<[f64]>,
}

/// View type for [`Twisties`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TwistiesView<'a> {
    re: &'a [f64],
    im: &'a [f64],
}

impl Twisties {
    /// Create a new [`Twisties`] containing the `2N`-th roots of unity with
    /// `n = N/2`.
    pub fn new(n: usize) -> Self {
        debug_assert!(n.is_power_of_two());
        let mut re = avec![0.0; n].into_boxed_slice();
        let mut im = avec![0.0; n].into_boxed_slice();

        let unit = core::f64::consts::PI / (2.0 * n as f64);
        for (i, (re, im)) in re.iter_mut().zip(im.iter_mut()).enumerate() {
            (*im, *re) = (i as f64 * unit).sin_cos();
        }

        Self { re, im }
    }

    pub fn as_view(&self) -> TwistiesView<'_> {
        TwistiesView {
            re: &self.re,
            im: &self.im,
        }
    }
}

/// Negacyclic Fast Fourier Transform. See [`FftView`] for the transform
/// functions.
#[derive(Clone, Debug)]
pub struct Fft {
    plan: Arc<(Twisties, Plan)>,
}

/// View type for [`Fft`].
#[derive(Clone, Copy, Debug)]
pub struct FftView<'a> {
    plan: &'a Plan,
    twisties: TwistiesView<'a>,
}

type PlanMap = RwLock<HashMap<usize, Arc<OnceLock<Arc<(Twisties, Plan)>>>>>;
static PLANS: OnceLock<PlanMap> = OnceLock::new();

fn plans() -> &'static PlanMap {
    PLANS.get_or_init(|| RwLock::new(HashMap::new()))
}

impl Fft {
    /// Negacyclic transform for real polynomials of the given size. Plans are
    /// cached per size for the lifetime of the process.
    pub fn new(size: PolynomialSize) -> Self {
        let global_plans = plans();

        let n = size.0;
        let get_plan = || {
            let plans = global_plans.read().unwrap();
            let plan = plans.get(&n).cloned();
            drop(plans);

            plan.map(|p| {
                p.get_or_init(|| {
                    Arc::new((
                        Twisties::new(n / 2),
                        Plan::new(n / 2, Method::Measure(Duration::from_millis(10))),
                    ))
                })
                .clone()
            })
        };

        // could not find a plan of the given size, lock the map again and try
        // to insert it
        let mut plans = global_plans.write().unwrap();
        if let Entry::Vacant(v) = plans.entry(n) {
            v.insert(Arc::new(OnceLock::new()));
        }
        drop(plans);

        Self {
            plan: get_plan().unwrap(),
        }
    }

    #[inline]
    pub fn as_view(&self) -> FftView<'_> {
        FftView {
            plan: &self.plan.1,
            twisties: self.plan.0.as_view(),
        }
    }
}

fn convert_forward_torus<Scalar: UnsignedTorus>(
    out: &mut [c64],
    in_re: &[Scalar],
    in_im: &[Scalar],
    twisties: TwistiesView<'_>,
) {
    let normalization = 2.0_f64.powi(-(Scalar::BITS as i32));

    for ((((out, in_re), in_im), w_re), w_im) in out
        .iter_mut()
        .zip(in_re)
        .zip(in_im)
        .zip(twisties.re)
        .zip(twisties.im)
    {
        let in_re: f64 = in_re.into_signed().cast_into();
        let in_im: f64 = in_im.into_signed().cast_into();
        *out = c64::new(in_re * normalization, in_im * normalization) * c64::new(*w_re, *w_im);
    }
}

fn convert_forward_integer<Scalar: UnsignedTorus>(
    out: &mut [c64],
    in_re: &[Scalar],
    in_im: &[Scalar],
    twisties: TwistiesView<'_>,
) {
    for ((((out, in_re), in_im), w_re), w_im) in out
        .iter_mut()
        .zip(in_re)
        .zip(in_im)
        .zip(twisties.re)
        .zip(twisties.im)
    {
        let in_re: f64 = in_re.into_signed().cast_into();
        let in_im: f64 = in_im.into_signed().cast_into();
        *out = c64::new(in_re, in_im) * c64::new(*w_re, *w_im);
    }
}

fn convert_backward_torus<Scalar: UnsignedTorus>(
    out_re: &mut [Scalar],
    out_im: &mut [Scalar],
    inp: &[c64],
    twisties: TwistiesView<'_>,
) {
    let normalization = 1.0 / inp.len() as f64;
    for ((((out_re, out_im), inp), w_re), w_im) in out_re
        .iter_mut()
        .zip(out_im.iter_mut())
        .zip(inp)
        .zip(twisties.re)
        .zip(twisties.im)
    {
        let tmp = inp * (c64::new(*w_re, -*w_im) * normalization);

        *out_re = Scalar::from_torus(tmp.re);
        *out_im = Scalar::from_torus(tmp.im);
    }
}

fn convert_add_backward_torus<Scalar: UnsignedTorus>(
    out_re: &mut [Scalar],
    out_im: &mut [Scalar],
    inp: &[c64],
    twisties: TwistiesView<'_>,
) {
    let normalization = 1.0 / inp.len() as f64;
    for ((((out_re, out_im), inp), w_re), w_im) in out_re
        .iter_mut()
        .zip(out_im.iter_mut())
        .zip(inp)
        .zip(twisties.re)
        .zip(twisties.im)
    {
        let tmp = inp * (c64::new(*w_re, -*w_im) * normalization);

        *out_re = (*out_re).wrapping_add(Scalar::from_torus(tmp.re));
        *out_im = (*out_im).wrapping_add(Scalar::from_torus(tmp.im));
    }
}

impl FftView<'_> {
    /// Return the polynomial size that this FFT was made for.
    pub fn polynomial_size(self) -> PolynomialSize {
        PolynomialSize(2 * self.plan.fft_size())
    }

    /// Return the memory required for a forward negacyclic FFT.
    pub fn forward_scratch(self) -> StackReq {
        self.plan
            .fft_scratch()
            .expect("scratch size computation overflowed")
    }

    /// Return the memory required for a backward negacyclic FFT.
    pub fn backward_scratch(self) -> StackReq {
        self.plan
            .fft_scratch()
            .expect("scratch size computation overflowed")
            .and(StackReq::new_aligned::<c64>(
                self.polynomial_size().to_fourier_polynomial_size().0,
                CACHELINE_ALIGN,
            ))
    }

    /// Perform a negacyclic real FFT of `standard`, viewed as torus elements,
    /// and store the result in `fourier`.
    pub fn forward_as_torus<Scalar, InputCont, OutputCont>(
        self,
        fourier: &mut FourierPolynomial<OutputCont>,
        standard: &Polynomial<InputCont>,
        stack: &mut PodStack,
    ) where
        Scalar: UnsignedTorus,
        InputCont: Container<Element = Scalar>,
        OutputCont: ContainerMut<Element = c64>,
    {
        self.forward_with_conv(fourier, standard, convert_forward_torus, stack);
    }

    /// Perform a negacyclic real FFT of `standard`, viewed as signed
    /// integers, and store the result in `fourier`.
    pub fn forward_as_integer<Scalar, InputCont, OutputCont>(
        self,
        fourier: &mut FourierPolynomial<OutputCont>,
        standard: &Polynomial<InputCont>,
        stack: &mut PodStack,
    ) where
        Scalar: UnsignedTorus,
        InputCont: Container<Element = Scalar>,
        OutputCont: ContainerMut<Element = c64>,
    {
        self.forward_with_conv(fourier, standard, convert_forward_integer, stack);
    }

    /// Perform an inverse negacyclic real FFT of `fourier` and store the
    /// rounded result in `standard`, viewed as torus elements.
    pub fn backward_as_torus<Scalar, InputCont, OutputCont>(
        self,
        standard: &mut Polynomial<OutputCont>,
        fourier: &FourierPolynomial<InputCont>,
        stack: &mut PodStack,
    ) where
        Scalar: UnsignedTorus,
        InputCont: Container<Element = c64>,
        OutputCont: ContainerMut<Element = Scalar>,
    {
        self.backward_with_conv(standard, fourier, convert_backward_torus, stack);
    }

    /// Perform an inverse negacyclic real FFT of `fourier` and add the
    /// rounded result to `standard`, viewed as torus elements.
    pub fn add_backward_as_torus<Scalar, InputCont, OutputCont>(
        self,
        standard: &mut Polynomial<OutputCont>,
        fourier: &FourierPolynomial<InputCont>,
        stack: &mut PodStack,
    ) where
        Scalar: UnsignedTorus,
        InputCont: Container<Element = c64>,
        OutputCont: ContainerMut<Element = Scalar>,
    {
        self.backward_with_conv(standard, fourier, convert_add_backward_torus, stack);
    }

    fn forward_with_conv<Scalar, InputCont, OutputCont, F>(
        self,
        fourier: &mut FourierPolynomial<OutputCont>,
        standard: &Polynomial<InputCont>,
        conv_fn: F,
        stack: &mut PodStack,
    ) where
        Scalar: UnsignedTorus,
        InputCont: Container<Element = Scalar>,
        OutputCont: ContainerMut<Element = c64>,
        F: Fn(&mut [c64], &[Scalar], &[Scalar], TwistiesView<'_>),
    {
        let fourier = fourier.data.as_mut();
        let standard = standard.as_ref();
        let n = standard.len();
        debug_assert_eq!(n, 2 * fourier.len());
        let (standard_re, standard_im) = standard.split_at(n / 2);
        conv_fn(fourier, standard_re, standard_im, self.twisties);
        self.plan.fwd(fourier, stack);
    }

    fn backward_with_conv<Scalar, InputCont, OutputCont, F>(
        self,
        standard: &mut Polynomial<OutputCont>,
        fourier: &FourierPolynomial<InputCont>,
        conv_fn: F,
        stack: &mut PodStack,
    ) where
        Scalar: UnsignedTorus,
        InputCont: Container<Element = c64>,
        OutputCont: ContainerMut<Element = Scalar>,
        F: Fn(&mut [Scalar], &mut [Scalar], &[c64], TwistiesView<'_>),
    {
        let fourier = fourier.data.as_ref();
        let standard = standard.as_mut();
        let n = standard.len();
        debug_assert_eq!(n, 2 * fourier.len());
        let (tmp, stack) = stack.make_aligned_raw::<c64>(fourier.len(), CACHELINE_ALIGN);
        tmp.copy_from_slice(fourier);
        self.plan.inv(tmp, stack);

        let (standard_re, standard_im) = standard.split_at_mut(n / 2);
        conv_fn(standard_re, standard_im, tmp, self.twisties);
    }
}

/// A polynomial in the folded Fourier domain.
#[derive(Clone, Debug)]
pub struct FourierPolynomial<C: Container<Element = c64>> {
    pub data: C,
}

pub type FourierPolynomialView<'a> = FourierPolynomial<&'a [c64]>;
pub type FourierPolynomialMutView<'a> = FourierPolynomial<&'a mut [c64]>;
pub type FourierPolynomialOwned = FourierPolynomial<ABox<[c64]>>;

impl FourierPolynomial<ABox<[c64]>> {
    pub fn new(size: FourierPolynomialSize) -> Self {
        Self {
            data: avec![c64::default(); size.0].into_boxed_slice(),
        }
    }
}

impl<C: Container<Element = c64>> FourierPolynomial<C> {
    pub fn fourier_polynomial_size(&self) -> FourierPolynomialSize {
        FourierPolynomialSize(self.data.container_len())
    }

    pub fn as_view(&self) -> FourierPolynomialView<'_> {
        FourierPolynomial {
            data: self.data.as_ref(),
        }
    }
}

impl<C: ContainerMut<Element = c64>> FourierPolynomial<C> {
    pub fn as_mut_view(&mut self) -> FourierPolynomialMutView<'_> {
        FourierPolynomial {
            data: self.data.as_mut(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commons::computation_buffers::ComputationBuffers;
    use crate::entities::polynomial::PolynomialOwned;

    #[test]
    fn forward_backward_round_trip() {
        let polynomial_size = PolynomialSize(256);
        let fft = Fft::new(polynomial_size);
        let fft = fft.as_view();

        let mut standard = PolynomialOwned::<u64>::new(polynomial_size);
        for (i, coeff) in standard.as_mut().iter_mut().enumerate() {
            *coeff = (i as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15) << 20;
        }

        let mut fourier = FourierPolynomialOwned::new(polynomial_size.to_fourier_polynomial_size());
        let mut roundtrip = PolynomialOwned::<u64>::new(polynomial_size);

        let mut buffers = ComputationBuffers::new();
        buffers.resize(
            fft.forward_scratch()
                .and(fft.backward_scratch())
                .unaligned_bytes_required(),
        );
        let stack = buffers.stack();

        fft.forward_as_torus(&mut fourier, &standard, stack);
        fft.backward_as_torus(&mut roundtrip, &fourier, stack);

        for (&a, &b) in standard.as_ref().iter().zip(roundtrip.as_ref()) {
            let diff = a.wrapping_sub(b);
            let diff = diff.min(diff.wrapping_neg());
            assert!(diff < 1 << 16, "{a} vs {b}");
        }
    }
}
