use crate::init::{build_tensor, nd_bytes_strides};
use crate::tensor::*;
use crate::util::CpuIndex;

impl Tensor {
    pub fn negate(self) -> Self {
        let dtype = self.dtype();
        let out_strides = nd_bytes_strides(&self.shape, dtype.num_bytes());
        let mut out_buf = vec![0u8; self.numel() * dtype.num_bytes()];

        {
            let x_buf = self.bytes.borrow();
            let mut idx = CpuIndex::new(&self.shape, &self.strides, self.byte_stride);
            let mut i_out = 0;
            while let Some(i_x) = idx.next() {
                dtype.read(&x_buf[i_x..]).negate().store(&mut out_buf[i_out..]);
                i_out += dtype.num_bytes();
            }
        }

        build_tensor(dtype, self.shape.clone(), out_strides, out_buf)
    }
}
