//! Shared test documents

/// A small KANJIDIC2 export: preamble, header and two characters
pub const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE kanjidic2 [
<!ELEMENT kanjidic2 (header,character*)>
<!ELEMENT header (file_version,database_version,date_of_creation)>
]>
<!-- KANJIDIC2 test extract -->
<kanjidic2>
<header>
<file_version>4</file_version>
<database_version>2024-015</database_version>
<date_of_creation>2024-01-15</date_of_creation>
</header>
<!-- Entry for Kanji: 亜 -->
<character>
<literal>亜</literal>
<codepoint>
<cp_value cp_type="ucs">4e9c</cp_value>
<cp_value cp_type="jis208">1-16-01</cp_value>
</codepoint>
<radical>
<rad_value rad_type="classical">7</rad_value>
<rad_value rad_type="nelson_c">1</rad_value>
</radical>
<misc>
<grade>8</grade>
<stroke_count>7</stroke_count>
<variant var_type="jis208">1-48-19</variant>
<freq>1509</freq>
<jlpt>1</jlpt>
</misc>
<dic_number>
<dic_ref dr_type="nelson_c">43</dic_ref>
<dic_ref dr_type="moro" m_vol="1" m_page="0525">272</dic_ref>
</dic_number>
<query_code>
<q_code qc_type="skip">4-7-1</q_code>
<q_code qc_type="four_corner">1010.6</q_code>
</query_code>
<reading_meaning>
<rmgroup>
<reading r_type="pinyin">ya4</reading>
<reading r_type="ja_on">ア</reading>
<reading r_type="ja_kun">つ.ぐ</reading>
<meaning>Asia</meaning>
<meaning>rank next</meaning>
<meaning m_lang="fr">Asie</meaning>
</rmgroup>
<nanori>や</nanori>
<nanori>つぎ</nanori>
</reading_meaning>
</character>
<!-- Entry for Kanji: 飴 -->
<character>
<literal>飴</literal>
<misc>
<stroke_count>13</stroke_count>
<stroke_count>14</stroke_count>
</misc>
<query_code>
<q_code qc_type="skip" skip_misclass="posn">1-8-6</q_code>
</query_code>
<reading_meaning>
<rmgroup>
<meaning>rice jelly &amp; candy</meaning>
</rmgroup>
</reading_meaning>
</character>
</kanjidic2>
"#;
