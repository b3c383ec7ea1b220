/// Walks every element of a strided buffer in logical (row-major) order,
/// yielding byte offsets. Rank-0 tensors yield exactly one offset; tensors
/// with a zero-sized dimension yield none.
#[derive(Debug, Eq, PartialEq)]
pub(crate) struct CpuIndex<'a> {
    indices: Vec<usize>,
    shape: &'a [usize],
    strides: &'a [usize],
    byte_stride: usize,
    next: Option<usize>,
    contiguous: Option<usize>,
}

impl<'a> CpuIndex<'a> {
    #[inline]
    pub(crate) fn new(shape: &'a [usize], strides: &'a [usize], byte_stride: usize) -> Self {
        let numel = shape.iter().product::<usize>();
        Self {
            indices: vec![0; shape.len()],
            shape,
            strides,
            byte_stride,
            next: (numel > 0).then_some(0),
            contiguous: (strides == crate::init::nd_bytes_strides(shape, byte_stride))
                .then(|| numel * byte_stride),
        }
    }

    #[inline(always)]
    pub(crate) fn next(&mut self) -> Option<usize> {
        match self.contiguous {
            Some(num_bytes) => match self.next.as_mut() {
                Some(i) => {
                    let idx = *i;
                    let next = idx + self.byte_stride;
                    if next >= num_bytes {
                        self.next = None;
                    } else {
                        *i = next;
                    }
                    Some(idx)
                }
                None => None,
            },
            None => self.next_with_idx().map(|(i, _)| i),
        }
    }

    #[inline(always)]
    pub(crate) fn next_with_idx(&mut self) -> Option<(usize, Vec<usize>)> {
        match (self.shape.len(), self.next.as_mut()) {
            (_, None) => None,
            (0, Some(i)) => {
                let idx = (*i, self.indices.clone());
                self.next = None;
                Some(idx)
            }
            (_, Some(i)) => {
                let idx = (*i, self.indices.clone());
                let mut dim = self.shape.len() - 1;
                loop {
                    self.indices[dim] += 1;
                    *i += self.strides[dim];

                    if self.indices[dim] < self.shape[dim] {
                        break;
                    }

                    *i -= self.shape[dim] * self.strides[dim];
                    self.indices[dim] = 0;

                    if dim == 0 {
                        self.next = None;
                        break;
                    }

                    dim -= 1;
                }
                Some(idx)
            }
        }
    }
}
