//! Formatter fixtures: source DDL in, canonical SQL out.
//!
//! Every case runs through the full parse + normalize + format pipeline,
//! so these also pin the normalization rules (synonym types, native
//! lengths, implicit defaults, lifted column-level keys).

use mysql_diff_rs::format::{self, FormatConfig};
use mysql_diff_rs::parser::Parser;

fn format_sql(input: &str) -> String {
    let stmts = Parser::new(input)
        .parse()
        .unwrap_or_else(|e| panic!("input should parse: {e}\ninput: {input}"));
    let mut out = String::new();
    format::statements(&mut out, &stmts, &FormatConfig::default()).unwrap();
    out
}

fn assert_format(input: &str, expect: &str) {
    assert_eq!(format_sql(input), expect, "input: {input}");
}

fn assert_parse_error(input: &str) {
    assert!(
        Parser::new(input).parse().is_err(),
        "input should not parse: {input}"
    );
}

#[test]
fn test_create_database_statements_are_not_rendered() {
    assert_format("create DATABASE hoge", "");
    assert_format("create DATABASE IF NOT EXISTS hoge", "");
    assert_format("create DATABASE hoge; create database fuga;", "");
}

#[test]
fn test_create_database_requires_an_identifier() {
    assert_parse_error("create DATABASE 17");
}

#[test]
fn test_integer_without_width_gets_native_length() {
    assert_format(
        "create table hoge_table ( id integer unsigned not null)",
        "CREATE TABLE `hoge_table` (\n`id` INT (10) UNSIGNED NOT NULL\n);\n",
    );
}

#[test]
fn test_c_style_comment_inside_body() {
    assert_format(
        "create table hoge ( /* id integer unsigned not null */ c varchar not null )",
        "CREATE TABLE `hoge` (\n`c` VARCHAR NOT NULL\n);\n",
    );
}

#[test]
fn test_double_dash_comment_inside_body() {
    assert_format(
        "create table hoge ( -- id integer unsigned not null;\n c varchar not null )",
        "CREATE TABLE `hoge` (\n`c` VARCHAR NOT NULL\n);\n",
    );
}

#[test]
fn test_trailing_comma_is_an_error() {
    assert_parse_error(
        "create table hoge (\na varchar(20) default \"hoge\",\nb varchar(20) default 'hoge',\nc int not null default 10,\n);\n",
    );
}

#[test]
fn test_default_values() {
    assert_format(
        "create table hoge (\na varchar(20) default \"hoge\",\nb varchar(20) default 'hoge',\nc int not null default 10\n);\n",
        "CREATE TABLE `hoge` (\n`a` VARCHAR (20) DEFAULT 'hoge',\n`b` VARCHAR (20) DEFAULT 'hoge',\n`c` INT (11) NOT NULL DEFAULT 10\n);\n",
    );
}

#[test]
fn test_srid_attribute() {
    assert_format(
        "create table hoge (a geometry not null srid 0);",
        "CREATE TABLE `hoge` (\n`a` GEOMETRY NOT NULL SRID 0\n);\n",
    );
}

#[test]
fn test_composite_primary_key() {
    assert_format(
        "create table hoge (\nid bigint unsigned not null auto_increment,\nc varchar(20) not null default \"hoge\",\nprimary key (id, c)\n);\n",
        "CREATE TABLE `hoge` (\n`id` BIGINT (20) UNSIGNED NOT NULL AUTO_INCREMENT,\n`c` VARCHAR (20) NOT NULL DEFAULT 'hoge',\nPRIMARY KEY (`id`, `c`)\n);\n",
    );
}

#[test]
fn test_table_options() {
    assert_format(
        "create table hoge (id bigint unsigned not null auto_increment) ENGINE=InnoDB AUTO_INCREMENT 10 DEFAULT CHARACTER SET = utf8 COMMENT = 'hoge comment';",
        "CREATE TABLE `hoge` (\n`id` BIGINT (20) UNSIGNED NOT NULL AUTO_INCREMENT\n) ENGINE = InnoDB, AUTO_INCREMENT = 10, DEFAULT CHARACTER SET = utf8, COMMENT = 'hoge comment';\n",
    );
}

#[test]
fn test_charset_normalizes_to_character_set() {
    assert_format(
        "create table hoge (id bigint unsigned not null auto_increment) ENGINE=InnoDB AUTO_INCREMENT 10 DEFAULT CHARSET = utf8 COMMENT = 'hoge comment';",
        "CREATE TABLE `hoge` (\n`id` BIGINT (20) UNSIGNED NOT NULL AUTO_INCREMENT\n) ENGINE = InnoDB, AUTO_INCREMENT = 10, DEFAULT CHARACTER SET = utf8, COMMENT = 'hoge comment';\n",
    );
}

#[test]
fn test_key_normalizes_to_index() {
    assert_format(
        "create table hoge (`id` bigint unsigned not null auto_increment,\n`c` varchar(20) not null,\nKEY (`id`), INDEX (`c`)\n);\n",
        "CREATE TABLE `hoge` (\n`id` BIGINT (20) UNSIGNED NOT NULL AUTO_INCREMENT,\n`c` VARCHAR (20) NOT NULL,\nINDEX (`id`),\nINDEX (`c`)\n);\n",
    );
}

#[test]
fn test_unique_index_and_primary_key() {
    assert_format(
        "create table hoge (`id` bigint unsigned not null auto_increment,\n`c` varchar(20) not null,\nUNIQUE INDEX `uniq_id` (`id`, `c`),\nPRIMARY KEY (`id`)\n);\n",
        "CREATE TABLE `hoge` (\n`id` BIGINT (20) UNSIGNED NOT NULL AUTO_INCREMENT,\n`c` VARCHAR (20) NOT NULL,\nUNIQUE INDEX `uniq_id` (`id`, `c`),\nPRIMARY KEY (`id`)\n);\n",
    );
}

#[test]
fn test_foreign_key_without_reference() {
    assert_format(
        "create table hoge ( `id` bigint unsigned not null auto_increment,\n`c` varchar(20) not null,\nFOREIGN KEY `fk_c` (`c`) )",
        "CREATE TABLE `hoge` (\n`id` BIGINT (20) UNSIGNED NOT NULL AUTO_INCREMENT,\n`c` VARCHAR (20) NOT NULL,\nFOREIGN KEY `fk_c` (`c`)\n);\n",
    );
}

#[test]
fn test_fulltext_index_forms() {
    for keyword in ["fulltext", "fulltext index", "fulltext key"] {
        assert_format(
            &format!("create table hoge (txt TEXT, {keyword} ft_idx(txt))"),
            "CREATE TABLE `hoge` (\n`txt` TEXT,\nFULLTEXT INDEX `ft_idx` (`txt`)\n);\n",
        );
    }
}

#[test]
fn test_fulltext_index_with_parser() {
    assert_format(
        "create table hoge (txt TEXT, fulltext ft_idx(txt) with parser ngram)",
        "CREATE TABLE `hoge` (\n`txt` TEXT,\nFULLTEXT INDEX `ft_idx` (`txt`) WITH PARSER `ngram`\n);\n",
    );
}

#[test]
fn test_foreign_key_reference() {
    assert_format(
        "create table hoge ( `id` bigint unsigned not null auto_increment,\n`c` varchar(20) not null,\nFOREIGN KEY `fk_c` (`c`) REFERENCES `fuga` (`id`) )",
        "CREATE TABLE `hoge` (\n`id` BIGINT (20) UNSIGNED NOT NULL AUTO_INCREMENT,\n`c` VARCHAR (20) NOT NULL,\nFOREIGN KEY `fk_c` (`c`) REFERENCES `fuga` (`id`)\n);\n",
    );
}

#[test]
fn test_foreign_key_reference_match() {
    assert_format(
        "create table hoge ( `id` bigint unsigned not null auto_increment,\n`c` varchar(20) not null,\nFOREIGN KEY `fk_c` (`c`) REFERENCES `fuga` (`id`) MATCH SIMPLE )",
        "CREATE TABLE `hoge` (\n`id` BIGINT (20) UNSIGNED NOT NULL AUTO_INCREMENT,\n`c` VARCHAR (20) NOT NULL,\nFOREIGN KEY `fk_c` (`c`) REFERENCES `fuga` (`id`) MATCH SIMPLE\n);\n",
    );
}

#[test]
fn test_foreign_key_reference_actions() {
    assert_format(
        "create table hoge ( `id` bigint unsigned not null auto_increment,\n`c` varchar(20) not null,\nFOREIGN KEY `fk_c` (`c`) REFERENCES `fuga` (`id`) ON DELETE SET NULL)",
        "CREATE TABLE `hoge` (\n`id` BIGINT (20) UNSIGNED NOT NULL AUTO_INCREMENT,\n`c` VARCHAR (20) NOT NULL,\nFOREIGN KEY `fk_c` (`c`) REFERENCES `fuga` (`id`) ON DELETE SET NULL\n);\n",
    );
    assert_format(
        "create table hoge ( `id` bigint unsigned not null auto_increment,\n`c` varchar(20) not null,\nFOREIGN KEY `fk_c` (`c`) REFERENCES `fuga` (`id`) MATCH PARTIAL ON DELETE NO ACTION)",
        "CREATE TABLE `hoge` (\n`id` BIGINT (20) UNSIGNED NOT NULL AUTO_INCREMENT,\n`c` VARCHAR (20) NOT NULL,\nFOREIGN KEY `fk_c` (`c`) REFERENCES `fuga` (`id`) MATCH PARTIAL ON DELETE NO ACTION\n);\n",
    );
    assert_format(
        "create table hoge ( `id` bigint unsigned not null auto_increment,\n`c` varchar(20) not null,\nFOREIGN KEY `fk_c` (`c`) REFERENCES `fuga` (`id`) ON DELETE NO ACTION ON UPDATE CASCADE)",
        "CREATE TABLE `hoge` (\n`id` BIGINT (20) UNSIGNED NOT NULL AUTO_INCREMENT,\n`c` VARCHAR (20) NOT NULL,\nFOREIGN KEY `fk_c` (`c`) REFERENCES `fuga` (`id`) ON DELETE NO ACTION ON UPDATE CASCADE\n);\n",
    );
}

#[test]
fn test_garbage_after_reference_is_an_error() {
    assert_parse_error(
        "create table hoge ( `id` bigint unsigned not null auto_increment,\n`c` varchar(20) not null,\nFOREIGN KEY `fk_c` (`c`) REFERENCES `fuga` (`id`) HOGE )",
    );
}

#[test]
fn test_decimal_keeps_explicit_length() {
    assert_format(
        "create table hoge (`foo` DECIMAL(32,30))",
        "CREATE TABLE `hoge` (\n`foo` DECIMAL (32,30) DEFAULT NULL\n);\n",
    );
}

#[test]
fn test_unique_key_with_constraint_symbol() {
    assert_format(
        "CREATE TABLE `fuga` ( `id` INTEGER NOT NULL AUTO_INCREMENT, CONSTRAINT `symbol` UNIQUE KEY `uniq_id` USING BTREE (`id`) )",
        "CREATE TABLE `fuga` (\n`id` INT (11) NOT NULL AUTO_INCREMENT,\nCONSTRAINT `symbol` UNIQUE INDEX `uniq_id` USING BTREE (`id`)\n);\n",
    );
}

#[test]
fn test_drop_table_statements_are_skipped() {
    assert_format(
        "DROP TABLE IF EXISTS `konboi_bug`; CREATE TABLE foo(`id` INT)",
        "CREATE TABLE `foo` (\n`id` INT (11) DEFAULT NULL\n);\n",
    );
}

#[test]
fn test_column_character_set() {
    assert_format(
        "CREATE TABLE `foo` (col TEXT CHARACTER SET latin1)",
        "CREATE TABLE `foo` (\n`col` TEXT CHARACTER SET `latin1`\n);\n",
    );
}

#[test]
fn test_on_update_current_timestamp_without_default() {
    assert_format(
        "CREATE TABLE `foo` (col DATETIME ON UPDATE CURRENT_TIMESTAMP)",
        "CREATE TABLE `foo` (\n`col` DATETIME ON UPDATE CURRENT_TIMESTAMP DEFAULT NULL\n);\n",
    );
}

#[test]
fn test_index_column_prefix_length() {
    assert_format(
        "CREATE TABLE `foo` (col TEXT, KEY col_idx (col(196)))",
        "CREATE TABLE `foo` (\n`col` TEXT,\nINDEX `col_idx` (`col`(196))\n);\n",
    );
}

#[test]
fn test_create_table_like() {
    assert_format("CREATE TABLE foo LIKE bar", "CREATE TABLE `foo` LIKE `bar`;\n");
}

#[test]
fn test_column_level_primary_key_is_lifted() {
    assert_format(
        "CREATE TABLE foo (id INTEGER PRIMARY KEY AUTO_INCREMENT)",
        "CREATE TABLE `foo` (\n`id` INT (11) DEFAULT NULL AUTO_INCREMENT,\nPRIMARY KEY (`id`)\n);\n",
    );
}

#[test]
fn test_column_level_keys_lift_regardless_of_option_order() {
    assert_format(
        "CREATE TABLE `test` (\n`id` int(11) PRIMARY KEY COMMENT 'aaa' NOT NULL,\nhoge int default 1 not null COMMENT 'bbb' UNIQUE\n);",
        "CREATE TABLE `test` (\n`id` INT (11) NOT NULL COMMENT 'aaa',\n`hoge` INT (11) NOT NULL DEFAULT 1 COMMENT 'bbb',\nPRIMARY KEY (`id`),\nUNIQUE INDEX `hoge` (`hoge`)\n);\n",
    );
    assert_format(
        "CREATE TABLE `test` (\n`id` int(11) COMMENT 'aaa' PRIMARY KEY NOT NULL,\nhoge int default 1 UNIQUE not null COMMENT 'bbb'\n);",
        "CREATE TABLE `test` (\n`id` INT (11) NOT NULL COMMENT 'aaa',\n`hoge` INT (11) NOT NULL DEFAULT 1 COMMENT 'bbb',\nPRIMARY KEY (`id`),\nUNIQUE INDEX `hoge` (`hoge`)\n);\n",
    );
}

#[test]
fn test_enum_and_set_columns() {
    assert_format(
        "CREATE TABLE `test` (\n`status` ENUM('on', 'off') NOT NULL DEFAULT 'off'\n);",
        "CREATE TABLE `test` (\n`status` ENUM ('on','off') NOT NULL DEFAULT 'off'\n);\n",
    );
    assert_format(
        "CREATE TABLE `test` (\n`status` SET('foo', 'bar', 'baz') NOT NULL DEFAULT 'foo,baz'\n);",
        "CREATE TABLE `test` (\n`status` SET ('foo','bar','baz') NOT NULL DEFAULT 'foo,baz'\n);\n",
    );
}

#[test]
fn test_set_without_value_list_is_an_error() {
    assert_parse_error("CREATE TABLE``(``SET)");
}

#[test]
fn test_boolean_defaults_normalize() {
    assert_format(
        "CREATE TABLE `test` (\n`valid` BOOLEAN not null default true\n);",
        "CREATE TABLE `test` (\n`valid` TINYINT (1) NOT NULL DEFAULT 1\n);\n",
    );
    assert_format(
        "CREATE TABLE `test` (\n`valid` BOOLEAN not null default false\n);",
        "CREATE TABLE `test` (\n`valid` TINYINT (1) NOT NULL DEFAULT 0\n);\n",
    );
    assert_format(
        "CREATE TABLE `test` (\n`valid` BOOL not null default true\n);",
        "CREATE TABLE `test` (\n`valid` TINYINT (1) NOT NULL DEFAULT 1\n);\n",
    );
    assert_format(
        "CREATE TABLE `test` (\n`valid` BOOL not null default false\n);",
        "CREATE TABLE `test` (\n`valid` TINYINT (1) NOT NULL DEFAULT 0\n);\n",
    );
}

#[test]
fn test_json_and_spatial_types() {
    for ctype in [
        "JSON",
        "GEOMETRY",
        "POINT",
        "LINESTRING",
        "POLYGON",
        "MULTIPOINT",
        "MULTILINESTRING",
        "MULTIPOLYGON",
        "GEOMETRYCOLLECTION",
    ] {
        assert_format(
            &format!("CREATE TABLE `test` (\n`valid` {ctype} not null\n);"),
            &format!("CREATE TABLE `test` (\n`valid` {ctype} NOT NULL\n);\n"),
        );
    }
}

#[test]
fn test_create_table_if_not_exists() {
    assert_format(
        "CREATE TABLE IF NOT EXISTS `test` (\n`id` INT (10) NOT NULL\n);",
        "CREATE TABLE IF NOT EXISTS `test` (\n`id` INT (10) NOT NULL\n);\n",
    );
}

#[test]
fn test_comma_separated_table_options() {
    assert_format(
        "CREATE TABLE foo (id INT(10) NOT NULL) ENGINE = InnoDB, DEFAULT CHARACTER SET = utf8mb4",
        "CREATE TABLE `foo` (\n`id` INT (10) NOT NULL\n) ENGINE = InnoDB, DEFAULT CHARACTER SET = utf8mb4;\n",
    );
}

#[test]
fn test_show_create_table_output_roundtrips() {
    assert_format(
        "DROP TABLE IF EXISTS `socialaccount_socialtoken`;\n\
         CREATE TABLE `socialaccount_socialtoken` (\n\
         `id` int(11) NOT NULL AUTO_INCREMENT,\n\
         `token` longtext COLLATE utf8mb4_unicode_ci NOT NULL,\n\
         `token_secret` longtext COLLATE utf8mb4_unicode_ci NOT NULL,\n\
         `expires_at` datetime(6) DEFAULT NULL,\n\
         `account_id` int(11) NOT NULL,\n\
         `app_id` int(11) NOT NULL,\n\
         PRIMARY KEY (`id`) USING BTREE,\n\
         UNIQUE KEY `socialaccount_socialtoken_app_id_account_id_fca4e0ac_uniq` (`app_id`,`account_id`) USING BTREE,\n\
         KEY `socialaccount_social_account_id_951f210e_fk_socialacc` (`account_id`) USING BTREE,\n\
         CONSTRAINT `socialaccount_social_account_id_951f210e_fk_socialacc` FOREIGN KEY (`account_id`) REFERENCES `socialaccount_socialaccount` (`id`),\n\
         CONSTRAINT `socialaccount_social_app_id_636a42d7_fk_socialacc` FOREIGN KEY (`app_id`) REFERENCES `socialaccount_socialapp` (`id`)\n\
         ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci ROW_FORMAT=DYNAMIC;",
        "CREATE TABLE `socialaccount_socialtoken` (\n\
         `id` INT (11) NOT NULL AUTO_INCREMENT,\n\
         `token` LONGTEXT COLLATE `utf8mb4_unicode_ci` NOT NULL,\n\
         `token_secret` LONGTEXT COLLATE `utf8mb4_unicode_ci` NOT NULL,\n\
         `expires_at` DATETIME (6) DEFAULT NULL,\n\
         `account_id` INT (11) NOT NULL,\n\
         `app_id` INT (11) NOT NULL,\n\
         PRIMARY KEY USING BTREE (`id`),\n\
         UNIQUE INDEX `socialaccount_socialtoken_app_id_account_id_fca4e0ac_uniq` USING BTREE (`app_id`, `account_id`),\n\
         INDEX `socialaccount_social_account_id_951f210e_fk_socialacc` USING BTREE (`account_id`),\n\
         CONSTRAINT `socialaccount_social_account_id_951f210e_fk_socialacc` FOREIGN KEY (`account_id`) REFERENCES `socialaccount_socialaccount` (`id`),\n\
         INDEX `socialaccount_social_app_id_636a42d7_fk_socialacc` (`app_id`),\n\
         CONSTRAINT `socialaccount_social_app_id_636a42d7_fk_socialacc` FOREIGN KEY (`app_id`) REFERENCES `socialaccount_socialapp` (`id`)\n\
         ) ENGINE = InnoDB, DEFAULT CHARACTER SET = utf8mb4, DEFAULT COLLATE = utf8mb4_unicode_ci, ROW_FORMAT = DYNAMIC;\n",
    );
}

#[test]
fn test_optimizer_hint_comments_alone() {
    assert_format(
        "/*!40101 SET @OLD_CHARACTER_SET_CLIENT=@@CHARACTER_SET_CLIENT */;\n\
         /*!40101 SET @OLD_CHARACTER_SET_RESULTS=@@CHARACTER_SET_RESULTS */;\n\
         /*!40101 SET @OLD_COLLATION_CONNECTION=@@COLLATION_CONNECTION */;",
        "",
    );
}

#[test]
fn test_comments_between_statements() {
    assert_format(
        "/* hello, world*/;\nCREATE TABLE foo (\na int);\n/* hello, world again! */;\nCREATE TABLE bar (\nb int);",
        "CREATE TABLE `foo` (\n`a` INT (11) DEFAULT NULL\n);\nCREATE TABLE `bar` (\n`b` INT (11) DEFAULT NULL\n);\n",
    );
}

#[test]
fn test_mysqldump_prologue() {
    assert_format(
        "DROP TABLE IF EXISTS `some_table`;\r\n\
         /*!40101 SET @saved_cs_client     = @@character_set_client */;\r\n\
         SET character_set_client = utf8mb4 ;\r\n\
         CREATE TABLE `some_table` (\r\n\
           `id` int(10) unsigned NOT NULL AUTO_INCREMENT,\r\n\
           `user_id` varchar(32) DEFAULT NULL,\r\n\
           `context` json DEFAULT NULL,\r\n\
           `created_at` datetime DEFAULT CURRENT_TIMESTAMP,\r\n\
           PRIMARY KEY (`id`),\r\n\
           KEY `created_at` (`created_at` DESC) /*!80000 INVISIBLE */,\r\n\
           KEY `user_id_idx` (`user_id`),\r\n\
           CONSTRAINT `some_table__user_id` FOREIGN KEY (`user_id`) REFERENCES `users` (`id`) ON DELETE SET NULL ON UPDATE SET NULL\r\n\
         ) ENGINE=InnoDB AUTO_INCREMENT=19 DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_0900_ai_ci;",
        "CREATE TABLE `some_table` (\n\
         `id` INT (10) UNSIGNED NOT NULL AUTO_INCREMENT,\n\
         `user_id` VARCHAR (32) DEFAULT NULL,\n\
         `context` JSON DEFAULT NULL,\n\
         `created_at` DATETIME DEFAULT CURRENT_TIMESTAMP,\n\
         PRIMARY KEY (`id`),\n\
         INDEX `created_at` (`created_at` DESC),\n\
         INDEX `user_id_idx` (`user_id`),\n\
         INDEX `some_table__user_id` (`user_id`),\n\
         CONSTRAINT `some_table__user_id` FOREIGN KEY (`user_id`) REFERENCES `users` (`id`) ON DELETE SET NULL ON UPDATE SET NULL\n\
         ) ENGINE = InnoDB, AUTO_INCREMENT = 19, DEFAULT CHARACTER SET = utf8mb4, DEFAULT COLLATE = utf8mb4_0900_ai_ci;\n",
    );
}

#[test]
fn test_default_now() {
    assert_format(
        "create table `test_log` (`created_at` DATETIME default NOW())",
        "CREATE TABLE `test_log` (\n`created_at` DATETIME DEFAULT NOW()\n);\n",
    );
}

#[test]
fn test_partition_options_are_ignored() {
    assert_format(
        "CREATE TABLE `test_tb` (  `t_id` char(17) NOT NULL,  `t_type` smallint(6) NOT NULL,  `cur_date` datetime NOT NULL) ENGINE=InnoDB DEFAULT CHARSET=utf8\
         /*!50100 PARTITION BY LIST (`t_type`)(PARTITION p_1 VALUES IN (1) ENGINE = InnoDB, PARTITION p_100 VALUES IN (100) ENGINE = InnoDB) */;\
         /*!40101 SET character_set_client = @saved_cs_client */;",
        "CREATE TABLE `test_tb` (\n`t_id` CHAR (17) NOT NULL,\n`t_type` SMALLINT (6) NOT NULL,\n`cur_date` DATETIME NOT NULL\n) ENGINE = InnoDB, DEFAULT CHARACTER SET = utf8;\n",
    );
}

#[test]
fn test_whitespace_between_options_and_semicolon() {
    assert_format(
        "CREATE TABLE foo (id INT(10) NOT NULL) ENGINE = InnoDB, DEFAULT CHARACTER SET = utf8mb4 \n/**/ ;",
        "CREATE TABLE `foo` (\n`id` INT (10) NOT NULL\n) ENGINE = InnoDB, DEFAULT CHARACTER SET = utf8mb4;\n",
    );
}
