use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, FnArg, ItemFn, Pat};

/// Time a function when the `perf_stats` feature is enabled.
///
/// The function body is wrapped with a guard that logs the elapsed time
/// through `tracing::info!` when it is dropped. Without the feature the
/// function is emitted unchanged.
///
/// # Features
/// - Auto-detects a `samples: usize` parameter and reports the cost per sample
/// - Otherwise logs only when the call takes longer than the threshold
///
/// # Example
/// ```ignore
/// #[profile]
/// pub fn sweep_sin(rng: &mut StdRng, samples: usize) -> ErrorStats {
///     // ... work ...
/// }
/// ```
///
/// # Optional Parameters
/// ```ignore
/// #[profile(5)]  // Custom threshold in milliseconds
/// pub fn expensive_function() { ... }
/// ```
#[proc_macro_attribute]
pub fn profile(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);

    let threshold_ms: u128 = if attr.is_empty() {
        1
    } else {
        attr.to_string().parse().unwrap_or(1)
    };

    let attrs = &input.attrs;
    let vis = &input.vis;
    let sig = &input.sig;
    let block = &input.block;
    let fn_name_str = sig.ident.to_string();

    // `samples: usize` switches the guard to per-sample reporting.
    let has_samples_param = sig.inputs.iter().any(|arg| {
        if let FnArg::Typed(pat_type) = arg {
            if let Pat::Ident(pat_ident) = &*pat_type.pat {
                if pat_ident.ident == "samples" {
                    let ty = &pat_type.ty;
                    return quote!(#ty).to_string() == "usize";
                }
            }
        }
        false
    });

    let profile_guard_def = if has_samples_param {
        quote! {
            struct ProfileGuard {
                name: &'static str,
                start: std::time::Instant,
                samples: usize,
            }
            impl Drop for ProfileGuard {
                fn drop(&mut self) {
                    let elapsed = self.start.elapsed();
                    let per_sample = elapsed.as_nanos() / (self.samples.max(1) as u128);
                    ::tracing::info!(
                        "[PERF] {}: {:?} ({} samples, {} ns/sample)",
                        self.name, elapsed, self.samples, per_sample
                    );
                }
            }
            ProfileGuard {
                name: #fn_name_str,
                start: std::time::Instant::now(),
                samples,
            }
        }
    } else {
        quote! {
            struct ProfileGuard {
                name: &'static str,
                start: std::time::Instant,
            }
            impl Drop for ProfileGuard {
                fn drop(&mut self) {
                    let elapsed = self.start.elapsed();
                    if elapsed.as_millis() > #threshold_ms {
                        ::tracing::info!("[PERF] {}: {:?}", self.name, elapsed);
                    }
                }
            }
            ProfileGuard {
                name: #fn_name_str,
                start: std::time::Instant::now(),
            }
        }
    };

    let output = quote! {
        #(#attrs)*
        #vis #sig {
            #[cfg(feature = "perf_stats")]
            let _profile_timer = {
                #profile_guard_def
            };

            #block
        }
    };

    output.into()
}
