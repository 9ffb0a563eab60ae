use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

pub fn derive_event(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    // Same path trick as the component derive.
    TokenStream::from(quote! {
        impl #impl_generics ::rusty_substrate::ecs::Event for #name #ty_generics #where_clause {
        }
    })
}
