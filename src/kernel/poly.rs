//! Minimax polynomial approximations over the normalized s2.30 domain.
//!
//! Each evaluator takes the centered argument `t = mantissa - 1.0` (or, for
//! the sine and exp2 families, the reduced argument itself) in s2.30 and
//! returns an s2.30 result. Coefficients are stored highest degree first.
//! The `LutM` variants split `[0, 1)` into `M` equal segments, each with
//! its own local polynomial in `t - segment_start`.
//!
//! The tables are fitted so that the constant term of every segment is the
//! exact function value at the segment start. `rcp(1)`, `sqrt(4^k)`,
//! `exp2(k)` and `log(1)` therefore come out exact in every tier.

use super::bits::qmul30;

#[inline]
fn horner<const N: usize>(coefs: &[i32; N], t: i32) -> i32 {
    let mut y = coefs[0];
    for &c in &coefs[1..] {
        y = qmul30(y, t).wrapping_add(c);
    }
    y
}

#[inline]
fn horner_lut<const N: usize, const M: usize>(table: &[[i32; N]; M], a: i32) -> i32 {
    let shift = 30 - M.trailing_zeros() as i32;
    let idx = (a >> shift).clamp(0, M as i32 - 1);
    horner(&table[idx as usize], a.wrapping_sub(idx << shift))
}

macro_rules! poly_fn {
    ($(#[$meta:meta])* $name:ident, $table:ident) => {
        $(#[$meta])*
        #[inline]
        pub fn $name(a: i32) -> i32 {
            horner(&$table, a)
        }
    };
}

macro_rules! poly_lut_fn {
    ($(#[$meta:meta])* $name:ident, $table:ident) => {
        $(#[$meta])*
        #[inline]
        pub fn $name(a: i32) -> i32 {
            horner_lut(&$table, a)
        }
    };
}

poly_fn!(
    /// `1 / (1 + t)`, max error about 2.5e-4.
    rcp_poly4, RCP_POLY4
);
poly_fn!(
    /// `1 / (1 + t)`, max error about 7e-6.
    rcp_poly6, RCP_POLY6
);
poly_lut_fn!(
    /// `1 / (1 + t)`, max error about 5e-8.
    rcp_poly4_lut8, RCP_POLY4_LUT8
);

poly_fn!(
    /// `sqrt(1 + t)`, max error about 3e-4.
    sqrt_poly3, SQRT_POLY3
);
poly_fn!(sqrt_poly4, SQRT_POLY4);
poly_lut_fn!(sqrt_poly3_lut8, SQRT_POLY3_LUT8);

poly_fn!(
    /// `1 / sqrt(1 + t)`, max error about 5e-4.
    rsqrt_poly3, RSQRT_POLY3
);
poly_fn!(rsqrt_poly5, RSQRT_POLY5);
poly_lut_fn!(rsqrt_poly3_lut16, RSQRT_POLY3_LUT16);

poly_fn!(
    /// `2^t` for `t` in `[0, 1)`.
    exp2_poly3, EXP2_POLY3
);
poly_fn!(exp2_poly4, EXP2_POLY4);
poly_fn!(exp2_poly5, EXP2_POLY5);

poly_fn!(
    /// `ln(1 + t)`.
    log_poly5, LOG_POLY5
);
poly_lut_fn!(log_poly3_lut8, LOG_POLY3_LUT8);
poly_lut_fn!(log_poly5_lut8, LOG_POLY5_LUT8);

poly_fn!(
    /// `log2(1 + t)`.
    log2_poly5, LOG2_POLY5
);
poly_lut_fn!(log2_poly3_lut16, LOG2_POLY3_LUT16);
poly_lut_fn!(log2_poly4_lut16, LOG2_POLY4_LUT16);

poly_fn!(
    /// `sin(z * pi / 2) / z` as a polynomial in `zz = z * z`, for `z` in
    /// `[-1, 1]`. Callers multiply the result by `z`.
    sin_poly2, SIN_POLY2
);
poly_fn!(sin_poly3, SIN_POLY3);
poly_fn!(sin_poly4, SIN_POLY4);

/// Sine of a quarter-turn angle `z` in s2.30 (`1.0` is a quarter turn).
///
/// Turns 1 to 3 are mirrored onto `[-1, 1]` by computing `2 - z`; the top
/// two bits of `z` differ exactly in that half of the period. The wrap of
/// `2^31 - z` back into `i32` is what folds the range.
#[inline]
fn unit_sin_with(z: i32, sin_poly: impl Fn(i32) -> i32) -> i32 {
    let z = if (z ^ (z << 1)) < 0 {
        ((1i64 << 31) - z as i64) as i32
    } else {
        z
    };
    let zz = qmul30(z, z);
    qmul30(sin_poly(zz), z)
}

#[inline]
pub fn unit_sin_poly4(z: i32) -> i32 {
    unit_sin_with(z, sin_poly4)
}

#[inline]
pub fn unit_sin_poly3(z: i32) -> i32 {
    unit_sin_with(z, sin_poly3)
}

#[inline]
pub fn unit_sin_poly2(z: i32) -> i32 {
    unit_sin_with(z, sin_poly2)
}

poly_fn!(
    /// `atan(k)` for `k` in `[0, 1]`.
    atan_poly4, ATAN_POLY4
);
poly_lut_fn!(atan_poly3_lut8, ATAN_POLY3_LUT8);
poly_lut_fn!(atan_poly5_lut8, ATAN_POLY5_LUT8);

const RCP_POLY4: [i32; 5] = [182108531, -611241254, 956154193, -1063618730, 1073741824];
const RCP_POLY6: [i32; 7] = [84635032, -370050489, 744567706, -984753157, 1061942541, -1073204840, 1073741824];
const RCP_POLY4_LUT8: [[i32; 5]; 8] = [
    [803814824, -1047305115, 1072688405, -1073728628, 1073741824],
    [459998606, -656924870, 753586770, -848381862, 954437177],
    [278460084, -432518240, 549463302, -687191084, 858993459],
    [176482057, -296202734, 412871023, -567927432, 780903145],
    [116204759, -209572509, 318043866, -477217301, 715827883],
    [79025255, -152405251, 250166254, -406623313, 660764199],
    [55247587, -113458626, 200306779, -350609049, 613566757],
    [39560158, -86189931, 162862832, -305419544, 572662306],
];
const SQRT_POLY3: [i32; 4] = [26275931, -116557566, 535040061, 1073741824];
const SQRT_POLY4: [i32; 5] = [-11666964, 49351311, -129371556, 536433295, 1073741824];
const SQRT_POLY3_LUT8: [[i32; 4]; 8] = [
    [57802254, -133587976, 536862245, 1073741824],
    [43750798, -112057428, 506160907, 1138875187],
    [34054797, -95741096, 480187842, 1200479854],
    [27120600, -83029194, 457842080, 1259073893],
    [22101332, -72900304, 438350051, 1315059792],
    [18157728, -64671143, 421154506, 1368757628],
    [15185316, -57881742, 405834952, 1420426919],
    [12852045, -52201716, 392074042, 1470281545],
];
const RSQRT_POLY3: [i32; 4] = [-98162568, 307257386, -524118653, 1073741824];
const RSQRT_POLY5: [i32; 6] = [-35953421, 144819509, -279612023, 392485344, -536243288, 1073741824];
const RSQRT_POLY3_LUT16: [[i32; 4]; 16] = [
    [-302889064, 401502320, -536859248, 1073741824],
    [-246425807, 345144723, -490194626, 1041682578],
    [-202805644, 299265589, -449919045, 1012333500],
    [-168631228, 261487938, -414871601, 985333074],
    [-141518212, 230061830, -384149179, 960383883],
    [-119762112, 203677922, -357039787, 937238702],
    [-102124101, 181342161, -332975346, 915690104],
    [-87690176, 162289864, -311497669, 895562589],
    [-75776721, 145925709, -292233553, 876706528],
    [-65866020, 131781137, -274876273, 858993459],
    [-57561481, 119483656, -259171669, 842312387],
    [-50556081, 108734404, -244907532, 826566842],
    [-44609814, 99291551, -231905447, 811672525],
    [-39533364, 90957874, -220014437, 797555404],
    [-35176140, 83571349, -209105980, 784150157],
    [-31417419, 76997961, -199070054, 771398898],
];
const EXP2_POLY3: [i32; 4] = [83908170, 242852026, 746848487, 1073741824];
const EXP2_POLY4: [i32; 5] = [14582754, 55781477, 259250136, 744122980, 1073741824];
const EXP2_POLY5: [i32; 6] = [2024323, 9635092, 59953370, 257862114, 744266799, 1073741824];
const LOG_POLY5: [i32; 6] = [33768168, -147002116, 314739404, -530872685, 1073628348, 0];
const LOG_POLY3_LUT8: [[i32; 4]; 8] = [
    [299326959, -532928403, 1073687639, 0],
    [215629484, -421713508, 954387342, 126468572],
    [158623530, -341925733, 858970434, 239598564],
    [120696406, -282808389, 780887204, 341937090],
    [93960257, -237784039, 715816499, 435364845],
    [74573345, -202707438, 660755855, 521310048],
    [60174080, -174851740, 613560501, 600882877],
    [49256132, -152363812, 572657525, 674963409],
];
const LOG_POLY5_LUT8: [[i32; 6]; 8] = [
    [159432000, -261493726, 357538749, -536863771, 1073741807, 0],
    [91326072, -164063411, 251183530, -424190662, 954437168, 126468572],
    [55326536, -108038747, 183147942, -343595399, 858993454, 239598564],
    [35086579, -73998655, 137619972, -283963635, 780903142, 341937090],
    [23114685, -52361875, 106012407, -238608603, 715827881, 435364845],
    [15775107, -38079434, 83384669, -203311381, 660764193, 521310048],
    [11030353, -28350515, 66766279, -175304346, 613566753, 600882877],
    [7899384, -21538068, 54285843, -152709653, 572662304, 674963409],
];
const LOG2_POLY5: [i32; 6] = [48717168, -212079224, 454072977, -765887390, 1548918293, 0];
const LOG2_POLY3_LUT16: [[i32; 4]; 16] = [
    [471216245, -772988749, 1549071279, 0],
    [394928134, -684874145, 1457951071, 93912511],
    [334259268, -611004206, 1376955015, 182455581],
    [285408082, -548467204, 1304484634, 266210141],
    [245631495, -495058859, 1239261126, 345667660],
    [213508036, -449091438, 1180247570, 421247625],
    [185762724, -409229477, 1126602014, 493310944],
    [163451344, -374455446, 1077618495, 562170370],
    [144222987, -343927796, 1032718147, 628098702],
    [127597696, -316982935, 991410620, 691335320],
    [113687999, -293086791, 953279638, 752091421],
    [101728871, -271793824, 917973146, 810554283],
    [91390030, -252739279, 885188525, 866890747],
    [82406095, -235620107, 854664896, 921250079],
    [74562184, -220182856, 826176161, 973766362],
    [67683049, -206214236, 799525399, 1024560487],
];
const LOG2_POLY4_LUT16: [[i32; 5]; 16] = [
    [-343839245, 514146095, -774495899, 1549081718, 0],
    [-271650584, 428847166, -686065048, 1457959320, 93912511],
    [-217452323, 361412569, -611957633, 1376961620, 182455581],
    [-176122255, 307401662, -549239510, 1304489985, 266210141],
    [-144161822, 263634824, -495691085, 1239265507, 345667660],
    [-118855332, 227794282, -449610041, 1180252929, 421247625],
    [-99309028, 198165745, -409665082, 1126605034, 493310944],
    [-83442020, 173458824, -374817499, 1077622215, 562170370],
    [-70476407, 152692908, -344235187, 1032721322, 628098702],
    [-60171027, 135113402, -317246926, 991412451, 691335320],
    [-51584312, 120131359, -293313124, 953281207, 752091421],
    [-44476159, 107284503, -271988980, 917974499, 810554283],
    [-38551297, 96205690, -252908446, 885189698, 866890747],
    [-33581015, 86600985, -235767472, 854665918, 921250079],
    [-29386556, 78233187, -220311820, 826177056, 973766362],
    [-25827029, 70909456, -206327584, 799526185, 1024560487],
];
const SIN_POLY2: [i32; 3] = [78333340, -690927888, 1686483042];
const SIN_POLY3: [i32; 4] = [-4693342, 85363173, -693557721, 1686628441];
const SIN_POLY4: [i32; 5] = [162864, -5018838, 85566407, -693598307, 1686629706];
const ATAN_POLY4: [i32; 5] = [151093158, -369395961, -14688682, 1076429969, 0];
const ATAN_POLY3_LUT8: [[i32; 4]; 8] = [
    [-349031529, -869751, 1073762456, 0],
    [-289586509, -132880499, 1057281290, 133525159],
    [-193339544, -241373048, 1010654758, 263043837],
    [-92367530, -312840274, 941430959, 385227074],
    [-9874163, -346105554, 859043963, 497837829],
    [45528805, -348574691, 772159812, 599791448],
    [75952335, -330615041, 687209662, 690954054],
    [87998040, -301600287, 608141055, 771837835],
];
const ATAN_POLY5_LUT8: [[i32; 6]; 8] = [
    [201255943, 2384426, -358061561, 2981, 1073741817, 0],
    [117967716, 131111126, -326025077, -130112101, 1057222701, 133525159],
    [10062745, 204338414, -242824300, -237776399, 1010580523, 263043837],
    [-64717756, 208203790, -139637136, -309485276, 941362686, 385227074],
    [-89925392, 165542737, -45841365, -343596888, 858993458, 497837829],
    [-80920337, 108208571, 22949261, -347026318, 772128971, 599791448],
    [-58500756, 57504517, 64604641, -329856203, 687194791, 690954054],
    [-36253619, 21270006, 84415101, -301379904, 608136982, 771837835],
];
