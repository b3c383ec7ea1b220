use crate::init::{build_tensor, nd_bytes_strides};
use crate::tensor::*;
use crate::util::CpuIndex;

impl Tensor {
    pub fn to_dtype(self, dst: Dtype) -> Self {
        let src = self.dtype();
        if src == dst {
            return self;
        }

        let out_strides = nd_bytes_strides(&self.shape, dst.num_bytes());
        let mut out_buf = vec![0u8; self.numel() * dst.num_bytes()];

        {
            let x_buf = self.bytes.borrow();
            let mut idx = CpuIndex::new(&self.shape, &self.strides, self.byte_stride);
            let mut i_out = 0;
            while let Some(i_x) = idx.next() {
                src.read(&x_buf[i_x..])
                    .to_dtype(dst)
                    .store(&mut out_buf[i_out..]);
                i_out += dst.num_bytes();
            }
        }

        build_tensor(dst, self.shape.clone(), out_strides, out_buf)
    }
}

#[cfg(test)]
mod tests {
    use crate::{tensor::*, tests::*};

    #[test]
    fn test_f32_f16_round_trip() {
        // all exactly representable in f16
        let x = Tensor::from([1.0f32, -2.5, 0.0, 1024.0]);
        let y = x.to_dtype(Dtype::Float16);
        assert_eq!(y.dtype(), Dtype::Float16);
        assert_eq!(y.strides(), &[2]);
        assert_all_close(
            &y.to_dtype(Dtype::Float32).into_vec::<f32>(),
            &[1.0, -2.5, 0.0, 1024.0],
        );
    }

    #[test]
    fn test_widen_to_f64() {
        let x = Tensor::from([1.5f32, -3.0]);
        assert_all_close(&x.to_dtype(Dtype::Float64).into_vec::<f64>(), &[1.5, -3.0]);
    }
}
