use bytemuck::Zeroable;

use crate::error::SdkError;
use crate::native::RawArray;

use super::Marshal;

/// Copy a native `(count, array)` pair into an owned sequence.
///
/// The result has exactly `count` elements; a zero count gives an empty
/// vector. A negative count, or a count larger than the buffer the engine
/// handed over, is a marshalling failure. If any element fails to convert
/// the partial vector is dropped and only the error is returned.
pub fn copy_array<M: Marshal>(raw: RawArray<'_, M::Native>) -> Result<Vec<M>, SdkError> {
    let count = usize::try_from(raw.count()).map_err(|_| {
        SdkError::marshalling(format!("native array reported negative count {}", raw.count()))
    })?;

    if count == 0 {
        return Ok(Vec::new());
    }

    let items = raw.items();
    if count > items.len() {
        return Err(SdkError::marshalling(format!(
            "native array reported {} elements but provided {}",
            count,
            items.len()
        )));
    }

    let mut copied = Vec::with_capacity(count);
    for item in &items[..count] {
        copied.push(M::from_native(item)?);
    }
    Ok(copied)
}

/// Pack values into a fixed native array plus count.
///
/// Unused slots are zeroed.
pub fn fill_array<M, const N: usize>(values: &[M]) -> Result<([M::Native; N], i32), SdkError>
where
    M: Marshal,
    M::Native: Zeroable + Copy,
{
    if values.len() > N {
        return Err(SdkError::marshalling(format!(
            "{} elements exceed native array capacity of {}",
            values.len(),
            N
        )));
    }

    let mut packed = [<M::Native as Zeroable>::zeroed(); N];
    for (slot, value) in packed.iter_mut().zip(values) {
        *slot = value.to_native()?;
    }
    Ok((packed, values.len() as i32))
}
