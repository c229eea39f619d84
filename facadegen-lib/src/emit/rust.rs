use super::idents::{ident, label_param, needs_non_snake_case_allowance, snake_ident};
use crate::Result;
use crate::compiler::{FacadeDefinition, ResolvedMetric};
use crate::decl::{BucketSpec, MetricType};
use core::fmt::Write;
use ohno::bail;
use proc_macro2::{Literal, TokenStream};
use quote::quote;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Crate the generated code links against unless told otherwise
pub const DEFAULT_RUNTIME_CRATE: &str = "facadegen_runtime";

/// First line of every generated file
pub const GENERATED_HEADER: &str = "// @generated by facadegen. Do not edit by hand.";

static CRATE_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("invalid regex"));

/// Emit Rust source for a set of facades
///
/// Namespaces become nested `pub mod` items, so `sample` and `sample::storage` share one
/// `sample` module. Every path into the runtime crate is absolute, so the output can be
/// `include!`d anywhere in a crate that depends on `runtime_crate`.
pub fn generate<W: Write>(facades: &[FacadeDefinition], runtime_crate: &str, writer: &mut W) -> Result<()> {
    if !CRATE_NAME_REGEX.is_match(runtime_crate) || runtime_crate == "_" {
        bail!("'{runtime_crate}' is not a valid runtime crate name");
    }

    let rt_ident = ident(runtime_crate);
    let rt = quote!(::#rt_ident);

    let mut root = ModuleNode::default();
    for facade in facades {
        root.insert(facade);
    }

    writeln!(writer, "{GENERATED_HEADER}")?;
    for (name, node) in &root.children {
        writeln!(writer)?;
        writeln!(writer, "{}", node.render(name, &rt))?;
    }

    Ok(())
}

#[derive(Default)]
struct ModuleNode<'a> {
    facade: Option<&'a FacadeDefinition>,
    children: BTreeMap<&'a str, ModuleNode<'a>>,
}

impl<'a> ModuleNode<'a> {
    fn insert(&mut self, facade: &'a FacadeDefinition) {
        let mut node = self;
        for segment in facade.namespace_segments() {
            node = node.children.entry(segment).or_default();
        }

        node.facade = Some(facade);
    }

    fn render(&self, name: &str, rt: &TokenStream) -> TokenStream {
        let module = ident(name);
        let facade = self.facade.map(|f| render_facade(f, rt));
        let children = self.children.iter().map(|(child, node)| node.render(child, rt));

        quote! {
            pub mod #module {
                #facade
                #(#children)*
            }
        }
    }
}

fn render_facade(facade: &FacadeDefinition, rt: &TokenStream) -> TokenStream {
    let type_name = ident(facade.type_name);
    let struct_doc = format!("Metrics declared in `{}`", facade.namespace);
    let type_name_str = facade.type_name;

    let fields: Vec<_> = facade.metrics.iter().map(|m| snake_ident(&m.field_name)).collect();
    let field_types = facade.metrics.iter().map(|m| handle_type(m, rt));
    let constructors = facade.metrics.iter().map(|m| render_constructor(m, rt));
    let accessors = facade.metrics.iter().map(|m| render_accessor(m, rt));

    quote! {
        #[doc = #struct_doc]
        pub struct #type_name {
            #(#fields: #field_types,)*
        }

        impl ::core::fmt::Debug for #type_name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.debug_struct(#type_name_str).finish_non_exhaustive()
            }
        }

        static FACADES: #rt::FacadeCache<#type_name> = #rt::FacadeCache::new();

        fn register_metrics(registry: &#rt::prometheus::Registry) -> #rt::prometheus::Result<#type_name> {
            #(#constructors)*

            #rt::register_all(
                registry,
                vec![
                    #(Box::new(#fields.clone()) as Box<dyn #rt::prometheus::core::Collector>,)*
                ],
            )?;

            Ok(#type_name { #(#fields,)* })
        }

        impl #type_name {
            /// Returns the facade bound to the process-wide default registry.
            ///
            /// Every call returns the same instance; the metrics are registered on first use.
            pub fn create() -> #rt::prometheus::Result<::std::sync::Arc<Self>> {
                Self::create_with_registry(#rt::default_registry())
            }

            /// Returns the facade bound to `registry`, registering its metrics on first use.
            pub fn create_with_registry(registry: &#rt::SharedRegistry) -> #rt::prometheus::Result<::std::sync::Arc<Self>> {
                FACADES.get_or_try_init(registry, register_metrics)
            }

            #(#accessors)*
        }
    }
}

/// Type of the field holding a metric's handle
fn handle_type(metric: &ResolvedMetric, rt: &TokenStream) -> TokenStream {
    let labeled = !metric.labels.is_empty();
    match (metric.metric_type, labeled) {
        (MetricType::Counter, false) => quote!(#rt::prometheus::Counter),
        (MetricType::Counter, true) => quote!(#rt::prometheus::CounterVec),
        (MetricType::Gauge, false) => quote!(#rt::prometheus::Gauge),
        (MetricType::Gauge, true) => quote!(#rt::prometheus::GaugeVec),
        (MetricType::Histogram, false) => quote!(#rt::prometheus::Histogram),
        (MetricType::Histogram, true) => quote!(#rt::prometheus::HistogramVec),
    }
}

/// Type handed out by a metric's accessor
fn child_type(metric_type: MetricType, rt: &TokenStream) -> TokenStream {
    match metric_type {
        MetricType::Counter => quote!(#rt::prometheus::Counter),
        MetricType::Gauge => quote!(#rt::prometheus::Gauge),
        MetricType::Histogram => quote!(#rt::prometheus::Histogram),
    }
}

fn render_constructor(metric: &ResolvedMetric, rt: &TokenStream) -> TokenStream {
    let field = snake_ident(&metric.field_name);
    let handle = handle_type(metric, rt);
    let name = metric.prom_name.as_str();
    let help = metric.help.as_str();

    let opts = match &metric.buckets {
        Some(spec) => {
            let buckets = render_buckets(spec, rt);
            quote!(#rt::prometheus::HistogramOpts::new(#name, #help).buckets(#buckets))
        }
        None if metric.metric_type.is_histogram() => quote!(#rt::prometheus::HistogramOpts::new(#name, #help)),
        None => quote!(#rt::prometheus::Opts::new(#name, #help)),
    };

    if metric.labels.is_empty() {
        quote! {
            let #field = #handle::with_opts(#opts)?;
        }
    } else {
        let labels = metric.labels.iter().map(String::as_str);
        quote! {
            let #field = #handle::new(#opts, &[#(#labels),*])?;
        }
    }
}

fn render_buckets(spec: &BucketSpec, rt: &TokenStream) -> TokenStream {
    match spec {
        BucketSpec::Exponential { start, factor, count } => {
            let (start, factor, count) = (Literal::f64_suffixed(*start), Literal::f64_suffixed(*factor), Literal::usize_suffixed(*count));
            quote!(#rt::prometheus::exponential_buckets(#start, #factor, #count)?)
        }
        BucketSpec::Linear { start, width, count } => {
            let (start, width, count) = (Literal::f64_suffixed(*start), Literal::f64_suffixed(*width), Literal::usize_suffixed(*count));
            quote!(#rt::prometheus::linear_buckets(#start, #width, #count)?)
        }
        BucketSpec::Explicit { .. } | BucketSpec::Default => {
            let bounds = spec.bounds().into_iter().map(Literal::f64_suffixed);
            quote!(vec![#(#bounds),*])
        }
    }
}

fn render_accessor(metric: &ResolvedMetric, rt: &TokenStream) -> TokenStream {
    let accessor = snake_ident(&metric.accessor_name);
    let field = snake_ident(&metric.field_name);
    let child = child_type(metric.metric_type, rt);
    let help = metric.help.as_str();

    if metric.labels.is_empty() {
        return quote! {
            #[doc = #help]
            #[must_use]
            pub fn #accessor(&self) -> #child {
                self.#field.clone()
            }
        };
    }

    let params: Vec<_> = metric.labels.iter().enumerate().map(|(i, label)| label_param(label, i)).collect();
    let arity = Literal::usize_unsuffixed(params.len());
    let allowance = needs_non_snake_case_allowance(&metric.labels).then(|| quote!(#[allow(non_snake_case, reason = "parameters are named after their labels")]));

    quote! {
        #[doc = #help]
        #allowance
        #[must_use]
        pub fn #accessor(&self, #(#params: &str),*) -> #child {
            let values: [&str; #arity] = [#(#params),*];
            self.#field.with_label_values(&values)
        }
    }
}
