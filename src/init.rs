use std::{cell::RefCell, rc::Rc};

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::dtype::{bf16, f16};
use crate::tensor::*;
use crate::util::CpuIndex;

thread_local! {
    pub(crate) static DEFAULT_DTYPE: RefCell<Dtype> = const {
        RefCell::new(Dtype::Float32)
    }
}

impl Default for Dtype {
    fn default() -> Self {
        DEFAULT_DTYPE.with_borrow(|dtype| *dtype)
    }
}

pub fn set_default_dtype(dtype: Dtype) {
    DEFAULT_DTYPE.with_borrow_mut(|default_dtype| *default_dtype = dtype);
}

pub struct WithDtypeGuard {
    prev: Dtype,
}

pub fn with_dtype(dtype: Dtype) -> WithDtypeGuard {
    WithDtypeGuard {
        prev: DEFAULT_DTYPE.with_borrow_mut(|curr| std::mem::replace(curr, dtype)),
    }
}

impl Drop for WithDtypeGuard {
    fn drop(&mut self) {
        DEFAULT_DTYPE.with_borrow_mut(|x| std::mem::replace(x, self.prev));
    }
}

/// ```
/// assert_eq!(refconv::init::nd_bytes_strides(&[3, 5, 7], 4), vec![140, 28, 4]);
/// ```
pub fn nd_bytes_strides(shape: &[usize], byte_stride: usize) -> Vec<usize> {
    let mut strides = Vec::with_capacity(shape.len());
    if shape.is_empty() {
        return strides;
    }

    let mut last = byte_stride;
    strides.push(last);

    for n in shape.iter().skip(1).rev() {
        last *= n;
        strides.insert(0, last);
    }

    strides
}

pub(crate) fn build_tensor(dtype: Dtype, shape: Vec<usize>, strides: Vec<usize>, bytes: Vec<u8>) -> Tensor {
    Tensor {
        dtype,
        shape,
        strides,
        byte_stride: dtype.num_bytes(),
        bytes: Rc::new(RefCell::new(bytes)),
    }
}

fn dtype_of<T: Copy + Default + Into<Scalar>>() -> Dtype {
    Into::<Scalar>::into(T::default()).dtype()
}

pub fn zeros<Shape>(shape: Shape) -> Tensor
where
    Shape: Into<Vec<usize>>,
{
    let shape = Into::<Vec<usize>>::into(shape);
    let dtype: Dtype = Default::default();
    let strides = nd_bytes_strides(&shape, dtype.num_bytes());
    let numel: usize = shape.iter().product();
    build_tensor(dtype, shape, strides, vec![0; numel * dtype.num_bytes()])
}

pub fn full<Shape, S>(shape: Shape, value: S) -> Tensor
where
    Shape: Into<Vec<usize>>,
    S: Into<Scalar>,
{
    let shape = Into::<Vec<usize>>::into(shape);
    let value = Into::<Scalar>::into(value);
    let dtype = value.dtype();
    let strides = nd_bytes_strides(&shape, dtype.num_bytes());
    let numel: usize = shape.iter().product();
    let num_bytes = numel * dtype.num_bytes();

    let mut buf = vec![0; num_bytes];
    for i in (0..num_bytes).step_by(dtype.num_bytes()) {
        value.store(&mut buf[i..]);
    }
    build_tensor(dtype, shape, strides, buf)
}

pub fn sample_uniform<Shape>(shape: Shape) -> Tensor
where
    Shape: Into<Vec<usize>>,
{
    let shape = Into::<Vec<usize>>::into(shape);
    let dtype: Dtype = Default::default();
    let strides = nd_bytes_strides(&shape, dtype.num_bytes());
    let numel: usize = shape.iter().product();
    let num_bytes = numel * dtype.num_bytes();

    let mut rng = rand::thread_rng();
    let mut buf = vec![0; num_bytes];
    for i in (0..num_bytes).step_by(dtype.num_bytes()) {
        let value = match dtype {
            Dtype::Float16 => Scalar::Float16(f16::from_f32(rng.gen())),
            Dtype::BFloat16 => Scalar::BFloat16(bf16::from_f32(rng.gen())),
            Dtype::Float32 => Scalar::Float32(rng.gen()),
            Dtype::Float64 => Scalar::Float64(rng.gen()),
        };
        value.store(&mut buf[i..]);
    }
    build_tensor(dtype, shape, strides, buf)
}

pub fn sample_normal<Shape>(shape: Shape) -> Tensor
where
    Shape: Into<Vec<usize>>,
{
    sample_dist(shape, &StandardNormal)
}

pub fn sample_dist<Shape, D>(shape: Shape, distr: &D) -> Tensor
where
    Shape: Into<Vec<usize>>,
    D: Distribution<f32>,
{
    let shape = Into::<Vec<usize>>::into(shape);
    let dtype: Dtype = Default::default();
    let strides = nd_bytes_strides(&shape, dtype.num_bytes());
    let numel: usize = shape.iter().product();
    let num_bytes = numel * dtype.num_bytes();

    let mut rng = rand::thread_rng();
    let mut buf = vec![0; num_bytes];
    for i in (0..num_bytes).step_by(dtype.num_bytes()) {
        let value = match dtype {
            Dtype::Float16 => Scalar::Float16(f16::from_f32(rng.sample(distr))),
            Dtype::BFloat16 => Scalar::BFloat16(bf16::from_f32(rng.sample(distr))),
            Dtype::Float32 => Scalar::Float32(rng.sample(distr)),
            Dtype::Float64 => Scalar::Float64(rng.sample(distr) as f64),
        };
        value.store(&mut buf[i..]);
    }
    build_tensor(dtype, shape, strides, buf)
}

pub fn copy_slice<T, Shape>(buf: &[T], shape: Shape) -> Tensor
where
    Shape: Into<Vec<usize>>,
    T: Copy + Default + Into<Scalar>,
{
    let dtype = dtype_of::<T>();
    let shape = Into::<Vec<usize>>::into(shape);
    let strides = nd_bytes_strides(&shape, dtype.num_bytes());
    let numel: usize = shape.iter().product();

    assert_eq!(
        numel,
        buf.len(),
        "Shape ({shape:?}) has {numel:?} elements, but found {} elements in src slice",
        buf.len()
    );

    let mut init_buf = vec![0; numel * dtype.num_bytes()];
    for (i, x) in buf.iter().enumerate() {
        let value = Into::<Scalar>::into(*x);
        value.store(&mut init_buf[(i * dtype.num_bytes())..]);
    }
    build_tensor(dtype, shape, strides, init_buf)
}

impl Tensor {
    pub fn into_vec<T>(self) -> Vec<T>
    where
        T: Copy + Default + Into<Scalar> + From<Scalar>,
    {
        let dtype = self.dtype();
        assert_eq!(dtype, dtype_of::<T>());
        let mut out = Vec::with_capacity(self.numel());
        let buf = self.bytes.borrow();
        let mut idx = CpuIndex::new(&self.shape, &self.strides, self.byte_stride);
        for _ in 0..self.numel() {
            let i = idx.next().unwrap();
            let value = dtype.read(&buf[i..]);
            out.push(value.into())
        }
        assert!(idx.next().is_none());
        out
    }
}

impl<T: Copy + Default + Into<Scalar>, const M: usize> From<[T; M]> for Tensor {
    fn from(value: [T; M]) -> Self {
        copy_slice(&value, [M])
    }
}

impl<T: Copy + Default + Into<Scalar>, const M: usize, const N: usize> From<[[T; N]; M]>
    for Tensor
{
    fn from(value: [[T; N]; M]) -> Self {
        copy_slice(
            unsafe { std::slice::from_raw_parts(value.as_ptr() as *const T, M * N) },
            [M, N],
        )
    }
}

impl<T: Copy + Default + Into<Scalar>, const M: usize, const N: usize, const O: usize>
    From<[[[T; O]; N]; M]> for Tensor
{
    fn from(value: [[[T; O]; N]; M]) -> Self {
        copy_slice(
            unsafe { std::slice::from_raw_parts(value.as_ptr() as *const T, M * N * O) },
            [M, N, O],
        )
    }
}

impl<
        T: Copy + Default + Into<Scalar>,
        const M: usize,
        const N: usize,
        const O: usize,
        const P: usize,
    > From<[[[[T; P]; O]; N]; M]> for Tensor
{
    fn from(value: [[[[T; P]; O]; N]; M]) -> Self {
        copy_slice(
            unsafe { std::slice::from_raw_parts(value.as_ptr() as *const T, M * N * O * P) },
            [M, N, O, P],
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::{init::*, tensor::*};

    #[test]
    fn test_copy_slice_round_trip() {
        let x = copy_slice(&[1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0], [2, 3]);
        assert_eq!(x.shape(), &[2, 3]);
        assert_eq!(x.strides(), &[12, 4]);
        assert_eq!(x.into_vec::<f32>(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_nested_literals() {
        let x = Tensor::from([[[[1.0f32], [2.0]], [[3.0], [4.0]]]]);
        assert_eq!(x.shape(), &[1, 2, 2, 1]);
        assert_eq!(x.into_vec::<f32>(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_with_dtype_guard() {
        assert_eq!(Dtype::default(), Dtype::Float32);
        {
            let _guard = with_dtype(Dtype::Float64);
            assert_eq!(Dtype::default(), Dtype::Float64);
            assert_eq!(zeros([2, 2]).dtype(), Dtype::Float64);
        }
        assert_eq!(Dtype::default(), Dtype::Float32);
    }

    #[test]
    fn test_full() {
        let x = full([3], 2.5f32);
        assert_eq!(x.into_vec::<f32>(), vec![2.5, 2.5, 2.5]);
    }
}
