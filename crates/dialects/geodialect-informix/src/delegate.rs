//! Forwarding of the common dialect hooks from a facade to its rule set.

/// Implements [`SqlDialect`](geodialect_core_common::SqlDialect) for a facade
/// struct by forwarding every hook to its `delegate` field.
macro_rules! delegate_sql_dialect {
    ($facade:ty) => {
        impl ::geodialect_core_common::SqlDialect for $facade {
            fn include_table(
                &self,
                schema: Option<&str>,
                table: &str,
                cx: &dyn ::geodialect_core_common::Connection,
            ) -> ::geodialect_core_common::SqlResult<bool> {
                self.delegate.include_table(schema, table, cx)
            }

            fn name_escape(&self) -> &str {
                self.delegate.name_escape()
            }

            fn encode_column_name(&self, prefix: Option<&str>, raw: &str, sql: &mut String) {
                self.delegate.encode_column_name(prefix, raw, sql);
            }

            fn encode_table_name(&self, raw: &str, sql: &mut String) {
                self.delegate.encode_table_name(raw, sql);
            }

            fn encode_schema_name(&self, raw: &str, sql: &mut String) {
                self.delegate.encode_schema_name(raw, sql);
            }

            fn encode_column_type(&self, sql_type_name: &str, sql: &mut String) {
                self.delegate.encode_column_type(sql_type_name, sql);
            }

            fn geometry_type_name(&self, code: i32) -> Option<&'static str> {
                self.delegate.geometry_type_name(code)
            }

            fn geometry_srid(
                &self,
                schema: Option<&str>,
                table: &str,
                column: &str,
                cx: &dyn ::geodialect_core_common::Connection,
            ) -> ::geodialect_core_common::DialectResult<Option<i32>> {
                self.delegate.geometry_srid(schema, table, column, cx)
            }

            fn encode_geometry_column(
                &self,
                column: &::geodialect_core_common::ColumnDescriptor,
                prefix: Option<&str>,
                srid: Option<i32>,
                sql: &mut String,
            ) {
                self.delegate.encode_geometry_column(column, prefix, srid, sql);
            }

            fn encode_geometry_envelope(&self, table: &str, column: &str, sql: &mut String) {
                self.delegate.encode_geometry_envelope(table, column, sql);
            }

            fn decode_geometry_envelope(
                &self,
                rs: &dyn ::geodialect_core_common::ResultSet,
                column: usize,
            ) -> ::geodialect_core_common::DialectResult<Option<::geodialect_core_common::Envelope>>
            {
                self.delegate.decode_geometry_envelope(rs, column)
            }

            fn decode_geometry_value(
                &self,
                descriptor: &::geodialect_core_common::ColumnDescriptor,
                rs: &dyn ::geodialect_core_common::ResultSet,
                column: &str,
            ) -> ::geodialect_core_common::DialectResult<Option<::geo_types::Geometry<f64>>> {
                self.delegate.decode_geometry_value(descriptor, rs, column)
            }

            fn class_to_sql_type(
                &self,
                class: ::geodialect_core_common::GeometryType,
            ) -> Option<i32> {
                self.delegate.class_to_sql_type(class)
            }

            fn sql_type_to_class(
                &self,
                code: i32,
            ) -> Option<::geodialect_core_common::GeometryType> {
                self.delegate.sql_type_to_class(code)
            }

            fn sql_type_name_to_class(
                &self,
                name: &str,
            ) -> Option<::geodialect_core_common::GeometryType> {
                self.delegate.sql_type_name_to_class(name)
            }

            fn sql_type_name_override(&self, code: i32) -> Option<&'static str> {
                self.delegate.sql_type_name_override(code)
            }

            fn encode_primary_key(&self, column: &str, sql: &mut String) {
                self.delegate.encode_primary_key(column, sql);
            }

            fn encode_post_column_create_table(
                &self,
                column: &::geodialect_core_common::ColumnDescriptor,
                sql: &mut String,
            ) {
                self.delegate.encode_post_column_create_table(column, sql);
            }

            fn encode_post_create_table(&self, table: &str, sql: &mut String) {
                self.delegate.encode_post_create_table(table, sql);
            }

            fn post_create_table(
                &self,
                schema: Option<&str>,
                feature_type: &::geodialect_core_common::FeatureType,
                cx: &dyn ::geodialect_core_common::Connection,
            ) -> ::geodialect_core_common::DialectResult<()> {
                self.delegate.post_create_table(schema, feature_type, cx)
            }

            fn lookup_generated_values_post_insert(&self) -> bool {
                self.delegate.lookup_generated_values_post_insert()
            }

            fn next_auto_generated_value(
                &self,
                schema: Option<&str>,
                table: &str,
                column: &str,
                cx: &dyn ::geodialect_core_common::Connection,
            ) -> ::geodialect_core_common::DialectResult<Option<i64>> {
                self.delegate.next_auto_generated_value(schema, table, column, cx)
            }

            fn last_auto_generated_value(
                &self,
                schema: Option<&str>,
                table: &str,
                column: &str,
                cx: &dyn ::geodialect_core_common::Connection,
            ) -> ::geodialect_core_common::DialectResult<Option<i64>> {
                self.delegate.last_auto_generated_value(schema, table, column, cx)
            }

            fn is_limit_offset_supported(&self) -> bool {
                self.delegate.is_limit_offset_supported()
            }

            fn apply_limit_offset(
                &self,
                sql: &mut String,
                limit: Option<u64>,
                offset: u64,
            ) -> ::geodialect_core_common::DialectResult<()> {
                self.delegate.apply_limit_offset(sql, limit, offset)
            }
        }
    };
}

pub(crate) use delegate_sql_dialect;
