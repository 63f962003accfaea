use {
    darling::{
        FromDeriveInput, FromField,
        ast::{Data, Fields},
        util::Ignored,
    },
    syn::{Generics, Ident, Member, Path, parse_quote},
};

#[derive(FromField)]
#[darling(attributes(puzzler))]
pub(crate) struct Field {
    pub(crate) ident: Option<Ident>,
}

impl Field {
    /// Get the identifier for a struct member.
    ///
    /// If the field has a named identifier, return it.
    /// Otherwise (tuple struct), return an anonymous identifier with the given index.
    pub(crate) fn struct_member_ident(&self, index: usize) -> Member {
        if let Some(ident) = &self.ident {
            ident.clone().into()
        } else {
            index.into()
        }
    }
}

pub(crate) trait FieldsExt {
    fn struct_member_ident_iter(&self) -> impl Iterator<Item = Member>;
}

impl FieldsExt for Fields<Field> {
    fn struct_member_ident_iter(&self) -> impl Iterator<Item = Member> {
        self.iter()
            .enumerate()
            .map(|(i, f)| f.struct_member_ident(i))
    }
}

#[derive(FromDeriveInput)]
#[darling(attributes(puzzler), supports(struct_any))]
pub(crate) struct TranscodeArgs {
    pub(crate) ident: Ident,
    pub(crate) generics: Generics,
    pub(crate) data: Data<Ignored, Field>,

    /// Used to determine the `puzzler` path.
    ///
    /// If `internal` is `true`, the generated code will use the `crate::` path.
    /// Otherwise, it will use the `puzzler` path.
    #[darling(default)]
    pub(crate) internal: bool,
}

/// Get the path to `puzzler` based on the `internal` flag.
pub(crate) fn get_crate_name(args: &TranscodeArgs) -> Path {
    if args.internal {
        parse_quote!(crate)
    } else {
        parse_quote!(::puzzler)
    }
}
