/*!
# DOT Serializer & Tabular Output (H)

Graph rendering/welding lives in `dot`; column selection and TSV rendering in `tsv`.
*/

pub mod dot;
pub mod tsv;
