use std::{cell::RefCell, rc::Rc};

pub use crate::dtype::{Dtype, Scalar};

/// Dense tensor over a raw byte buffer. Clones share the buffer; every op
/// that produces new values allocates a fresh one.
#[derive(Debug, Clone)]
pub struct Tensor {
    pub(crate) dtype: Dtype,
    pub(crate) shape: Vec<usize>,
    pub(crate) strides: Vec<usize>,
    pub(crate) byte_stride: usize,
    pub(crate) bytes: Rc<RefCell<Vec<u8>>>,
}

impl Tensor {
    pub fn dtype(&self) -> Dtype {
        self.dtype
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn num_dims(&self) -> usize {
        self.shape.len()
    }

    /// Byte offset of the element at `index`. Strides are byte strides, so
    /// this holds for non-contiguous layouts too.
    #[inline]
    pub(crate) fn byte_offset(&self, index: &[usize]) -> usize {
        index
            .iter()
            .zip(self.strides.iter())
            .map(|(i, stride)| i * stride)
            .sum()
    }
}

impl std::fmt::Display for Tensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn fmt_dim(
            t: &Tensor,
            buf: &[u8],
            index: &mut Vec<usize>,
            f: &mut std::fmt::Formatter<'_>,
        ) -> std::fmt::Result {
            if index.len() == t.shape.len() {
                return write!(f, "{:?}", t.dtype.read(&buf[t.byte_offset(index)..]));
            }
            let innermost = index.len() + 1 == t.shape.len();
            f.write_str("[")?;
            for i in 0..t.shape[index.len()] {
                if i > 0 {
                    f.write_str(if innermost { ", " } else { ",\n " })?;
                }
                index.push(i);
                fmt_dim(t, buf, index, f)?;
                index.pop();
            }
            f.write_str("]")
        }

        let buf = self.bytes.borrow();
        fmt_dim(self, &buf, &mut Vec::new(), f)
    }
}

#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    ShapeMismatch {
        op: &'static str,
        lhs: Vec<usize>,
        rhs: Vec<usize>,
    },
    InvalidPadding(String),
}

#[cfg(test)]
mod tests {
    use crate::tensor::*;

    #[test]
    fn test_display_nested() {
        let x = Tensor::from([[1.0f32, 2.0], [3.0, 4.0]]);
        assert_eq!(x.to_string(), "[[1, 2],\n [3, 4]]");
    }

    #[test]
    fn test_display_scalar_rank() {
        let x = Tensor::from([5.0f32]);
        assert_eq!(x.to_string(), "[5]");
    }
}
