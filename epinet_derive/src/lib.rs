extern crate proc_macro;
extern crate quote;
extern crate syn;

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput, Ident};

/// Generates the `from_value` constructor used by the solver registry, and
/// the `SerializableSolver` implementation that reports the solver type
/// name and serializes the solver configuration.  `ReportableSolver` and
/// `SerializableSolver` must be in scope at the derive site.
#[proc_macro_derive(SerializableSolver)]
pub fn solver(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let name = input.ident;
    let tokens = quote! {
        impl #name {
            pub fn from_value(
                value: serde_yaml::Value,
            ) -> Result<Box<dyn ReportableSolver>, serde_yaml::Error> {
                let solver: Box<dyn ReportableSolver> = Box::new(serde_yaml::from_value::<Self>(value)?);
                Ok(solver)
            }
        }
        impl SerializableSolver for #name {
            fn get_type(&self) -> &'static str {
                stringify!(#name)
            }
            fn serialize(&self) -> serde_yaml::Value {
                serde_yaml::to_value(self).unwrap_or(serde_yaml::Value::Null)
            }
        }
    };
    tokens.into()
}

/// Registers a custom solver type with the solver factory, so scenarios
/// can deserialize it by type name.
#[proc_macro]
pub fn register(item: TokenStream) -> TokenStream {
    let name = parse_macro_input!(item as Ident);
    let tokens = quote! {
        epinet::simulator::solver_factory::register(
            stringify!(#name),
            #name::from_value as epinet::simulator::solver_factory::SolverConstructor
        );
    };
    tokens.into()
}
