//! User-facing text table (Amharic). `{}` marks the single placeholder a
//! template carries; fill it with [`fill`].

pub mod buttons {
    pub const RENT: &str = "ኪራይ";
    pub const SELL: &str = "ሽያጭ";

    pub const RESIDENCE: &str = "🏠 #የመኖሪያ";
    pub const SHOP: &str = "🏪 #የንግድ";
    pub const OFFICE: &str = "🏢 #ቢሮ";
    pub const CAFE: &str = "☕ #ካፌ/#ምግብ_ቤት/#ባር";
    pub const WAREHOUSE: &str = "🏭 #የመጋዘን";
    pub const OTHER: &str = "📌 #ሌላ";

    pub const TRADITIONAL: &str = "🏡 #ግቢ_ቤት ";
    pub const CONDOMINIUM: &str = "🏢 #ኮንዶሚኒየም";
    pub const APARTMENT: &str = "🏢 #አፓርትመንት";
    pub const COMPOUND_VILLA: &str = "🏡 #ኮምፓውንድ_ቪላ";

    pub const SINGLE_ROOM: &str = "🚪 #ነጠላ_ክፍል";
    pub const ONE_BEDROOM: &str = "🛏️ #ባለ_1_መኝታ ";
    pub const TWO_BEDROOM: &str = "🛏️ #ባለ_2_መኝታ";
    pub const THREE_BEDROOM: &str = "🛏️ #ባለ_3_መኝታ";
    pub const MORE_THAN_THREE: &str = "🛏️ #ከ3_መኝታ_በላይ";

    pub const AREA_SMALL: &str = "#ከ_15_ካሬ_በታች";
    pub const AREA_16_25: &str = "#ከ16_25 ካሬ";
    pub const AREA_26_50: &str = "#ከ26_50 ካሬ";
    pub const AREA_51_75: &str = "#ከ51_75 ካሬ";
    pub const AREA_76_110: &str = "#ከ76_110 ካሬ";
    pub const AREA_LARGE: &str = "#ከ_110_ካሬ_በላይ";

    pub const PREVIEW: &str = "preview  👀 ቅድመ እይታ";
    pub const SHARE_CONTACT: &str = "📱 አድራሻ ያጋሩ";
    pub const CONFIRM: &str = "✅ አረጋግጥ";
    pub const CANCEL: &str = "❌ ሰርዝ";
}

pub mod messages {
    pub const START: &str = "👋 እንኳን ደህና መጡ! አዲስ የቤት ማስታወቂያ ለመለጠፍ  /post ይጠቀሙ።";
    pub const POST_START: &str = "ቤትዎን ለመሸጥ ወይም ለማከራየት ይፈልጋሉ?";
    pub const ASK_PROPERTY_USE: &str = "ቤቱ  ለምን ዓይነት አገልግሎት ታስቧል ?";
    pub const ASK_HOUSE_TYPE: &str = "የቤቱን አይነት ይምረጡ:";
    pub const ASK_ROOMS: &str = "የክፍሎች ብዛት ይምረጡ:";
    pub const ASK_AREA: &str = "የቤቱን ስፋት ይምረጡ:";
    pub const ASK_LOCATION: &str = "ቤቱ የሚገኝበት አካባቢ ያስገቡ:";
    pub const ASK_PRICE: &str = "ዋጋውን ያስገቡ:";
    pub const ASK_INFO: &str = "ተጨማሪ መረጃ ያስገቡ (ሰፈር፣ ዝርዝሮች፣ ወዘተ):";
    pub const ASK_CONTACT: &str = "የእርስዎን ስልክ ቁጥር ያጋሩ:";
    pub const ASK_PHOTOS: &str = "እባክዎ የቤቱን ፎቶዎች ይላኩ (ከ3 ያልበለጠ)፣ ፎቶ ከሌሎት /preview ይጫኑ";
    pub const MAX_PHOTOS: &str = "ከ3 ፎቶ በላይ መላክ አይችሉም።";
    pub const PHOTO_ADDED: &str = " {} መጨመር ወይም ከጨረሱ /preview ማየት ይችላሉ።";
    pub const ALL_PHOTOS_ADDED: &str = "ሁሉም ፎቶዎች ተጨምረዋል! ዝግጁ ሲሆኑ /preview ይጫኑ።";
    pub const PHOTO_ERROR: &str = "ፎቶ ሲጨመር ስህተት ተከስቷል። እባክዎ እንደገና ይሞክሩ።";

    pub const PREVIEW_TITLE: &str = "📋 አዲስ የቤት ማስታወቂያ፣ \n";
    pub const PROPERTY_ID: &str = "🆔 የቤት መለያ: {}\n";
    pub const RENT_OR_SELL: &str = "💼 አይነት: {}\n";
    pub const PROPERTY_USE: &str = "🏢 የቤት አገልግሎት: {}\n";
    pub const HOUSE_TYPE: &str = "🏠 የቤት አይነት: {}\n";
    pub const ROOMS: &str = "🚪 የክፍሎች ብዛት: {}\n";
    pub const AREA: &str = "📏 ስፋት: {}\n";
    pub const LOCATION: &str = "📍 ቦታ: {}\n";
    pub const PRICE: &str = "💰 ዋጋ: {}\n";
    pub const DETAILS: &str = "📝 ተጨማሪ መረጃ: {}\n";
    pub const CONTACT: &str = "📞 አድራሻ: {}\n";
    pub const POSTED_BY: &str = "👤 የለጠፈው: {}\n";
    pub const DATE: &str = "📅 ቀን: {}\n";
    pub const FOOTER: &str = "\n እንደዚህ አይነት ማስታወቂያ ለመለጠፍ በቴሌግራም @busi_admin ማናገር ወይም በ 0993550504 መደወል እና ማስመዝገብ ይችላሉ  \n https://t.me/bet_kiray_et ";

    pub const CONFIRM_PROMPT: &str = "ሁሉም መረጃ ትክክል ነው?";
    pub const SUCCESS: &str = "✅ የንብረት ማስታወቂያዎ በተሳካ ሁኔታ ተለጥፏል! /start ";
    pub const CANCELED: &str = "❌ ማስታወቂያ ማስቀመጥ ተሰርዟል። /start";
    pub const OPERATION_CANCELED: &str = "❌ ክዋኔው ተሰርዟል። /start";
    pub const SHEET_ERROR: &str = "የማስታወቂያ መዝገብ ስህተት: {}";

    pub const INVALID_CHOICE: &str = "እባክዎ ከተሰጡት አማራጮች አንዱን ይምረጡ።";
    pub const INVALID_LOCATION: &str = "እባክዎ ትክክለኛ አካባቢ  ያስገቡ:";
    pub const INVALID_PRICE: &str = "እባክዎ ትክክለኛ ዋጋ ያስገቡ:";
    pub const INVALID_CONTACT: &str = "እባክዎ ትክክለኛ 10-ዲጂት ስልክ ቁጥር ያስገቡ:";
    pub const CONTACT_FORMAT_EXAMPLE: &str = "(ምሳሌ: 0911223344)";

    pub const HELP: &str = "📚 የቤት ማስታወቂያ ቦት መመሪያ 📚 እንደዚህ አይነት ማስታወቂያ ለመለጠፍ በቴሌግራም ቦት @Betkiray_V5_bot ወይም @busi_admin ማናገር ወይም በ 0993550504 መደወል እና ማስመዝገብ ይችላሉ  \n https://t.me/bet_kiray_et

🔹 /start - ቦቱን ለመጠቀም ይጀምሩ
🔹 /post - አዲስ ማስታወቂያ ለመለጠፍ
🔹 /cancel - ለማቋረጥ
🔹 /help - ይህን መመሪያ ያሳያል

📌 ማስታወቂያ ለመለጠፍ ሂደት:
1. /post ይጫኑ
2. ኪራይ ወይም ሽያጭ ይምረጡ
3. የቤቱ አገልግሎት አይነት
4. የቤቱ አይነት (ከሆነ)
5. የክፍሎች ብዛት
6. ስፋት (በካሬ ሜትር)
7. ቦታ/አድራሻ
8. ዋጋ
9. ተጨማሪ መረጃ
10. የእርስዎ ስልክ ቁጥር
11. ፎቶዎች (ከ3 ያልበለጠ)
";
}

/// Substitute the first `{}` in `template` with `value`.
pub fn fill(template: &str, value: impl std::fmt::Display) -> String {
    template.replacen("{}", &value.to_string(), 1)
}
