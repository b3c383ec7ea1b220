use crate::init::{build_tensor, nd_bytes_strides};
use crate::tensor::*;

/// Zero-padding policy of the convolution, named after the framework
/// spellings it mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Padding {
    Valid,
    Same,
}

impl std::str::FromStr for Padding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "VALID" => Ok(Self::Valid),
            "SAME" => Ok(Self::Same),
            _ => Err(Error::InvalidPadding(std::format!(
                "unrecognized padding mode {s:?}"
            ))),
        }
    }
}

impl Padding {
    /// Output extent and leading pad along one spatial axis. `None` when the
    /// filter overruns the input under `Valid`.
    fn out_dim(self, size: usize, filter: usize, stride: usize) -> Option<(usize, usize)> {
        match self {
            Padding::Valid => (size >= filter).then(|| ((size - filter) / stride + 1, 0)),
            Padding::Same => {
                let out = size.div_ceil(stride);
                let total = (out.saturating_sub(1) * stride + filter).saturating_sub(size);
                // odd leftover pads the trailing edge
                Some((out, total / 2))
            }
        }
    }
}

impl Tensor {
    /// Cross-correlation of an NHWC input with an HWIO filter. Positions
    /// outside the input contribute zero.
    pub fn conv2d(
        self,
        filter: Tensor,
        strides: (usize, usize),
        padding: Padding,
    ) -> Result<Self, Error> {
        assert_eq!(self.dtype(), filter.dtype());

        let mismatch = || Error::ShapeMismatch {
            op: "conv2d",
            lhs: self.shape.clone(),
            rhs: filter.shape.clone(),
        };

        if self.num_dims() != 4 || filter.num_dims() != 4 {
            return Err(mismatch());
        }
        let (batch, in_h, in_w, in_c) = (self.shape[0], self.shape[1], self.shape[2], self.shape[3]);
        let (f_h, f_w, f_in_c, out_c) = (
            filter.shape[0],
            filter.shape[1],
            filter.shape[2],
            filter.shape[3],
        );
        if in_c != f_in_c {
            return Err(mismatch());
        }

        let (stride_h, stride_w) = strides;
        if stride_h == 0 || stride_w == 0 {
            return Err(Error::InvalidPadding(std::format!(
                "strides must be positive, got ({stride_h}, {stride_w})"
            )));
        }

        let (out_h, pad_top) = padding.out_dim(in_h, f_h, stride_h).ok_or_else(mismatch)?;
        let (out_w, pad_left) = padding.out_dim(in_w, f_w, stride_w).ok_or_else(mismatch)?;

        let dtype = self.dtype();
        let out_shape = vec![batch, out_h, out_w, out_c];
        let out_strides = nd_bytes_strides(&out_shape, dtype.num_bytes());
        let numel = batch * out_h * out_w * out_c;
        let mut out_buf = vec![0u8; numel * dtype.num_bytes()];

        {
            let x_buf = self.bytes.borrow();
            let f_buf = filter.bytes.borrow();
            let mut i_out = 0;
            for n in 0..batch {
                for i in 0..out_h {
                    for j in 0..out_w {
                        let in_h_base = (i * stride_h) as isize - pad_top as isize;
                        let in_w_base = (j * stride_w) as isize - pad_left as isize;
                        for k in 0..out_c {
                            let mut acc = dtype.zero();
                            for f_i in 0..f_h {
                                for f_j in 0..f_w {
                                    let in_i = in_h_base + f_i as isize;
                                    let in_j = in_w_base + f_j as isize;
                                    if in_i < 0
                                        || in_i >= in_h as isize
                                        || in_j < 0
                                        || in_j >= in_w as isize
                                    {
                                        continue;
                                    }
                                    for c in 0..in_c {
                                        let x = dtype.read(
                                            &x_buf[self.byte_offset(&[
                                                n,
                                                in_i as usize,
                                                in_j as usize,
                                                c,
                                            ])..],
                                        );
                                        let w = dtype
                                            .read(&f_buf[filter.byte_offset(&[f_i, f_j, c, k])..]);
                                        acc = acc + x * w;
                                    }
                                }
                            }
                            acc.store(&mut out_buf[i_out..]);
                            i_out += dtype.num_bytes();
                        }
                    }
                }
            }
        }

        Ok(build_tensor(dtype, out_shape, out_strides, out_buf))
    }
}
