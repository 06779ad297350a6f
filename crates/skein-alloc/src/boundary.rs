//! Local failure boundary for allocating container work.

use skein_core::sink::Reporter;
use skein_core::AllocError;

/// Run `body` and, if it fails to allocate, append an error naming `what`
/// to the reporter before passing the failure on.
///
/// Internal code wraps each group of container operations in one boundary
/// so allocation failure reaches the host as a status code plus sink text,
/// never as a panic.
///
/// ```
/// use skein_alloc::{alloc_boundary, HostVec};
/// use skein_core::Reporter;
///
/// let scratch = alloc_boundary(Reporter::none(), "scratch buffer", || {
///     let mut v = HostVec::new();
///     v.try_extend_from_slice(&[1.0f32, 2.0, 3.0])?;
///     Ok(v)
/// })
/// .unwrap();
/// assert_eq!(scratch.len(), 3);
/// ```
pub fn alloc_boundary<T>(
    reporter: Reporter<'_>,
    what: &str,
    body: impl FnOnce() -> Result<T, AllocError>,
) -> Result<T, AllocError> {
    body().inspect_err(|e| {
        skein_core::report_error!(reporter, "{what}: {e}");
    })
}
