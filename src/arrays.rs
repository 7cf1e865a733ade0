use crate::error::{Error, Result};
use aligned_vec::{AVec, ConstAlign};
use std::collections::HashSet;
use std::ops::{Index, IndexMut};

const ALIGN: usize = 64;

/// Row-major 2D array in a single aligned buffer. Element `(x, y)` lives at `y * width + x`.
#[derive(Debug, Clone)]
pub struct Array2D<T> {
    pub data: AVec<T, ConstAlign<ALIGN>>,
    pub width: usize,
    pub height: usize,
}

/// Per-pixel superpixel labels of one image.
pub type LabelMap = Array2D<u32>;

fn checked_area(width: usize, height: usize) -> Result<usize> {
    width.checked_mul(height).ok_or_else(|| {
        Error::InvalidInput(format!("dimensions {width}x{height} overflow the address space"))
    })
}

impl<T> Array2D<T> {
    pub fn from_slice(data: &[T], width: usize, height: usize) -> Result<Self>
    where
        T: Clone,
    {
        let area = checked_area(width, height)?;
        if data.len() != area {
            return Err(Error::InvalidInput(format!(
                "buffer of {} elements does not match dimensions {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data: AVec::from_slice(ALIGN, data),
        })
    }

    pub fn from_fill(value: T, width: usize, height: usize) -> Self
    where
        T: Clone + Copy,
    {
        let data: AVec<T, ConstAlign<ALIGN>> =
            AVec::from_iter(ALIGN, (0..width * height).map(|_| value));
        Self {
            width,
            height,
            data,
        }
    }

    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        self.data.fill(value)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get_row(&self, row: usize) -> &[T] {
        debug_assert!(row < self.height);
        &self.data[(self.width * row)..(self.width * row + self.width)]
    }

    pub fn get_row_mut(&mut self, row: usize) -> &mut [T] {
        debug_assert!(row < self.height);
        &mut self.data[(self.width * row)..(self.width * row + self.width)]
    }

    #[inline(always)]
    pub fn get_index(&self, x: usize, y: usize) -> usize {
        debug_assert!(
            self.width > x,
            "Index ({x}, {y}) is out of bounds ({}, {})",
            self.width,
            self.height
        );
        debug_assert!(
            self.height > y,
            "Index ({x}, {y}) is out of bounds ({}, {})",
            self.width,
            self.height
        );
        self.width * y + x
    }
}

impl Array2D<u32> {
    /// Builds a label map from nested rows. All rows must have the same length.
    pub fn from_rows<R: AsRef<[u32]>>(rows: &[R]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let area = checked_area(width, height)?;
        let mut data: AVec<u32, ConstAlign<ALIGN>> = AVec::with_capacity(ALIGN, area);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(Error::InvalidInput(format!(
                    "row {y} has {} labels, expected {width}",
                    row.len()
                )));
            }
            for label in row {
                data.push(*label);
            }
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Builds a label map from signed labels (e.g. a `CV_32SC1` matrix). Negative labels are
    /// rejected.
    pub fn try_from_i32(labels: &[i32], width: usize, height: usize) -> Result<Self> {
        let area = checked_area(width, height)?;
        if labels.len() != area {
            return Err(Error::InvalidInput(format!(
                "buffer of {} labels does not match dimensions {width}x{height}",
                labels.len()
            )));
        }
        if let Some(i) = labels.iter().position(|l| *l < 0) {
            return Err(Error::InvalidInput(format!(
                "negative label {} at ({}, {})",
                labels[i],
                i % width,
                i / width
            )));
        }
        Ok(Self {
            width,
            height,
            data: AVec::from_iter(ALIGN, labels.iter().map(|l| *l as u32)),
        })
    }

    /// Number of distinct label values, regardless of connectivity.
    pub fn count_labels(&self) -> u32 {
        self.data.iter().collect::<HashSet<_>>().len() as u32
    }
}

impl<T> Index<(usize, usize)> for Array2D<T> {
    type Output = T;
    fn index(&self, (x, y): (usize, usize)) -> &Self::Output {
        &self.data[self.get_index(x, y)]
    }
}

impl<T> IndexMut<(usize, usize)> for Array2D<T> {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Self::Output {
        let idx = self.get_index(x, y);
        &mut self.data[idx]
    }
}
