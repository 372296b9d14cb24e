struct List {
    target_cpu: &'static str,
    target_arch: &'static str,
    target_features: &'static str,
}

const LIST: &[List] = &[
    List {
        target_cpu: "v3",
        target_arch: "x86_64",
        target_features:
            "avx,avx2,bmi1,bmi2,cmpxchg16b,f16c,fma,fxsr,lzcnt,movbe,popcnt,sse,sse2,sse3,sse4.1,sse4.2,ssse3,xsave",
    },
    List {
        target_cpu: "v2",
        target_arch: "x86_64",
        target_features: "cmpxchg16b,fxsr,popcnt,sse,sse2,sse3,sse4.1,sse4.2,ssse3",
    },
    List {
        target_cpu: "neon",
        target_arch: "aarch64",
        target_features: "neon",
    },
];

fn lookup(target_cpu: &str) -> &'static List {
    LIST.iter()
        .find(|list| list.target_cpu == target_cpu)
        .unwrap_or_else(|| panic!("unknown target_cpu `{target_cpu}`"))
}

struct TargetCpu {
    enable: String,
}

impl syn::parse::Parse for TargetCpu {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let _: syn::Ident = input.parse()?;
        let _: syn::Token![=] = input.parse()?;
        let enable: syn::LitStr = input.parse()?;
        Ok(Self {
            enable: enable.value(),
        })
    }
}

/// Expands `#[target_cpu(enable = "v3")]` to the `#[target_feature]` list of
/// that CPU level. Several levels may be joined with commas.
#[proc_macro_attribute]
pub fn target_cpu(
    attr: proc_macro::TokenStream,
    item: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    let attr = syn::parse_macro_input!(attr as TargetCpu);
    let mut result = quote::quote! {};
    for cpu in attr.enable.split(',') {
        let target_features = lookup(cpu.trim()).target_features;
        result.extend(quote::quote!(#[target_feature(enable = #target_features)]));
    }
    result.extend(proc_macro2::TokenStream::from(item));
    result.into()
}

/// Generates one module per CPU level with a cached runtime probe, plus the
/// crate-level `init` and `detected` functions.
#[proc_macro]
pub fn main(_: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let mut modules = quote::quote! {};
    let mut init = quote::quote! {};
    let mut detected = quote::quote! {};
    for x in LIST {
        let ident = syn::Ident::new(x.target_cpu, proc_macro2::Span::mixed_site());
        let target_cpu = x.target_cpu;
        let target_arch = x.target_arch;
        let joined = x.target_features;
        let target_features = x.target_features.split(',').collect::<Vec<_>>();
        modules.extend(quote::quote! {
            #[cfg(target_arch = #target_arch)]
            pub mod #ident {
                use std::sync::atomic::{AtomicU8, Ordering};

                const UNKNOWN: u8 = 0;
                const ABSENT: u8 = 1;
                const PRESENT: u8 = 2;

                static STATE: AtomicU8 = AtomicU8::new(UNKNOWN);

                pub const NAME: &str = #target_cpu;

                pub const TARGET_FEATURES: &str = #joined;

                #[cfg(target_arch = "x86_64")]
                pub fn test() -> bool {
                    true #(&& std::arch::is_x86_feature_detected!(#target_features))*
                }

                #[cfg(target_arch = "aarch64")]
                pub fn test() -> bool {
                    true #(&& std::arch::is_aarch64_feature_detected!(#target_features))*
                }

                pub(crate) fn init() -> bool {
                    let found = test();
                    STATE.store(if found { PRESENT } else { ABSENT }, Ordering::Relaxed);
                    found
                }

                pub fn detect() -> bool {
                    match STATE.load(Ordering::Relaxed) {
                        UNKNOWN => init(),
                        state => state == PRESENT,
                    }
                }
            }
        });
        init.extend(quote::quote! {
            #[cfg(target_arch = #target_arch)]
            self::#ident::init();
        });
        detected.extend(quote::quote! {
            #[cfg(target_arch = #target_arch)]
            if self::#ident::detect() {
                list.push(#target_cpu);
            }
        });
    }
    quote::quote! {
        #modules

        pub fn init() {
            #init
        }

        #[allow(unused_mut)]
        pub fn detected() -> Vec<&'static str> {
            let mut list = Vec::new();
            #detected
            list
        }
    }
    .into()
}
