//! Dense dynamic-rank tensor.

use std::ops::Sub;

use ttchain_linalg::Matrix;

/// A dense N-dimensional tensor of `f64` values.
///
/// Entries are stored row-major (last index fastest). The type has value
/// semantics: reshapes and arithmetic produce new tensors, so no two
/// logically distinct tensors alias the same storage.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseTensor {
    dims: Vec<usize>,
    data: Vec<f64>,
}

impl DenseTensor {
    /// Create a tensor from flat row-major data.
    ///
    /// # Panics
    /// Panics if `data.len()` does not equal the product of `dims`.
    pub fn from_vec(dims: Vec<usize>, data: Vec<f64>) -> Self {
        let size: usize = dims.iter().product();
        assert_eq!(data.len(), size, "data length does not match shape {:?}", dims);
        Self { dims, data }
    }

    /// Create a zero-filled tensor.
    pub fn zeros(dims: Vec<usize>) -> Self {
        let size = dims.iter().product();
        Self {
            dims,
            data: vec![0.0; size],
        }
    }

    /// Create a tensor by evaluating `f` at every multi-index, row-major.
    pub fn from_fn(dims: Vec<usize>, mut f: impl FnMut(&[usize]) -> f64) -> Self {
        let size: usize = dims.iter().product();
        let mut data = Vec::with_capacity(size);
        if size == 0 {
            return Self { dims, data };
        }

        let mut idx = vec![0usize; dims.len()];
        loop {
            data.push(f(&idx));

            // Advance the multi-index, last index fastest.
            let mut carry = true;
            for i in (0..dims.len()).rev() {
                if carry {
                    idx[i] += 1;
                    if idx[i] >= dims[i] {
                        idx[i] = 0;
                    } else {
                        carry = false;
                    }
                }
            }
            if carry {
                break;
            }
        }
        Self { dims, data }
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// The shape tuple.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Total number of entries.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// The flat row-major entries.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Row-major offset of a multi-index.
    fn offset(&self, idx: &[usize]) -> usize {
        assert_eq!(idx.len(), self.dims.len(), "index length does not match rank");
        let mut offset = 0;
        for (i, (&x, &d)) in idx.iter().zip(&self.dims).enumerate() {
            assert!(x < d, "index {} out of bounds at dimension {}", x, i);
            offset = offset * d + x;
        }
        offset
    }

    /// Entry at a multi-index.
    pub fn get(&self, idx: &[usize]) -> f64 {
        self.data[self.offset(idx)]
    }

    /// Set the entry at a multi-index.
    pub fn set(&mut self, idx: &[usize], value: f64) {
        let offset = self.offset(idx);
        self.data[offset] = value;
    }

    /// View the same entries under a new shape.
    ///
    /// # Panics
    /// Panics if the new shape has a different total size.
    pub fn reshape(&self, dims: Vec<usize>) -> Self {
        Self::from_vec(dims, self.data.clone())
    }

    /// View the entries as a `rows × cols` matrix.
    ///
    /// # Panics
    /// Panics if `rows * cols` does not equal the tensor size.
    pub fn to_matrix(&self, rows: usize, cols: usize) -> Matrix {
        assert_eq!(rows * cols, self.size(), "matrix shape does not match tensor size");
        Matrix::from_fn([rows, cols], |idx| self.data[idx[0] * cols + idx[1]])
    }

    /// Create a 2-D tensor from a matrix.
    pub fn from_matrix(m: &Matrix) -> Self {
        let rows = m.dim(0);
        let cols = m.dim(1);
        Self::from_fn(vec![rows, cols], |idx| m[[idx[0], idx[1]]])
    }
}

impl Sub for &DenseTensor {
    type Output = DenseTensor;

    fn sub(self, rhs: &DenseTensor) -> DenseTensor {
        assert_eq!(self.dims, rhs.dims, "shape mismatch in tensor subtraction");
        let data = self
            .data
            .iter()
            .zip(&rhs.data)
            .map(|(a, b)| a - b)
            .collect();
        DenseTensor {
            dims: self.dims.clone(),
            data,
        }
    }
}
