//! Procedural macros for the catalog service
//!
//! - `mutation_result!` - Generate GraphQL mutation payload types

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse::Parse, parse::ParseStream, parse_macro_input, Ident, Token};

/// Generate a GraphQL mutation payload with `success`, `errors` and an optional entity field.
///
/// # Usage
///
/// ```ignore
/// // Status only (success + errors)
/// mutation_result!(DeleteResult);
///
/// // With entity field
/// mutation_result!(CreateBookResult, book: Book);
/// ```
///
/// # Generated Code
///
/// For `mutation_result!(CreateBookResult, book: Book)`:
///
/// ```ignore
/// #[derive(Debug, Clone, async_graphql::SimpleObject)]
/// pub struct CreateBookResult {
///     pub book: Option<Book>,
///     pub success: bool,
///     pub errors: Vec<String>,
/// }
///
/// impl CreateBookResult {
///     pub fn ok(book: Book) -> Self { ... }
///     pub fn failure(errors: Vec<String>) -> Self { ... }
/// }
/// ```
#[proc_macro]
pub fn mutation_result(input: TokenStream) -> TokenStream {
    let parsed = parse_macro_input!(input as MutationResultInput);

    let struct_name = &parsed.name;

    let output = if let Some((field_name, field_type)) = parsed.field {
        quote! {
            #[derive(Debug, Clone, async_graphql::SimpleObject)]
            pub struct #struct_name {
                pub #field_name: Option<#field_type>,
                pub success: bool,
                pub errors: Vec<String>,
            }

            impl #struct_name {
                pub fn ok(#field_name: #field_type) -> Self {
                    Self {
                        #field_name: Some(#field_name),
                        success: true,
                        errors: Vec::new(),
                    }
                }

                pub fn failure(errors: Vec<String>) -> Self {
                    Self {
                        #field_name: None,
                        success: false,
                        errors,
                    }
                }
            }
        }
    } else {
        quote! {
            #[derive(Debug, Clone, async_graphql::SimpleObject)]
            pub struct #struct_name {
                pub success: bool,
                pub errors: Vec<String>,
            }

            impl #struct_name {
                pub fn ok() -> Self {
                    Self {
                        success: true,
                        errors: Vec::new(),
                    }
                }

                pub fn failure(errors: Vec<String>) -> Self {
                    Self {
                        success: false,
                        errors,
                    }
                }
            }
        }
    };

    output.into()
}

/// Input for mutation_result! macro
struct MutationResultInput {
    name: Ident,
    field: Option<(Ident, Ident)>,
}

impl Parse for MutationResultInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let name: Ident = input.parse()?;

        let field = if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
            let field_name: Ident = input.parse()?;
            input.parse::<Token![:]>()?;
            let field_type: Ident = input.parse()?;
            Some((field_name, field_type))
        } else {
            None
        };

        Ok(MutationResultInput { name, field })
    }
}
