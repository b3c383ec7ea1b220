use crate::init::{build_tensor, nd_bytes_strides};
use crate::tensor::*;
use crate::util::CpuIndex;

impl Tensor {
    /// Adds `bias[k]` to every element whose trailing-axis index is `k`.
    pub fn bias_add(self, bias: Tensor) -> Result<Self, Error> {
        assert_eq!(self.dtype(), bias.dtype());

        let channels = self.shape.last().copied().unwrap_or(0);
        if self.num_dims() == 0 || bias.num_dims() != 1 || bias.shape[0] != channels {
            return Err(Error::ShapeMismatch {
                op: "bias_add",
                lhs: self.shape.clone(),
                rhs: bias.shape.clone(),
            });
        }

        let dtype = self.dtype();
        let out_strides = nd_bytes_strides(&self.shape, dtype.num_bytes());
        let mut out_buf = vec![0u8; self.numel() * dtype.num_bytes()];

        {
            let x_buf = self.bytes.borrow();
            let b_buf = bias.bytes.borrow();
            let mut idx = CpuIndex::new(&self.shape, &self.strides, self.byte_stride);
            let mut i_out = 0;
            while let Some((i_x, index)) = idx.next_with_idx() {
                let x = dtype.read(&x_buf[i_x..]);
                let k = *index.last().unwrap();
                let b = dtype.read(&b_buf[bias.byte_offset(&[k])..]);
                (x + b).store(&mut out_buf[i_out..]);
                i_out += dtype.num_bytes();
            }
        }

        Ok(build_tensor(dtype, self.shape.clone(), out_strides, out_buf))
    }
}
